quantity!(Hours, f64, "h");
