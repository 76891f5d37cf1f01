use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{Estimation, FleetCapacityTable, PowerTable, SalesTable, Year},
    superchargers::Supercharger,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Right-aligned cell, dimmed and italic if forecasted.
fn estimated_cell(content: impl Display, estimation: Estimation) -> Cell {
    let cell = Cell::new(content).set_alignment(CellAlignment::Right);
    if estimation.is_forecast() {
        cell.add_attribute(Attribute::Dim).add_attribute(Attribute::Italic)
    } else {
        cell
    }
}

fn year_cell(year: Year, estimation: Estimation) -> Cell {
    let cell = estimated_cell(year, estimation);
    if estimation.is_forecast() { cell } else { cell.add_attribute(Attribute::Bold) }
}

pub fn build_sales_table(sales: &SalesTable) -> Table {
    let mut table = new_table();
    table.set_header(std::iter::once("Year").chain(sales.models().iter().map(String::as_str)));
    for row in sales.rows() {
        table.add_row(std::iter::once(year_cell(row.year, row.estimation)).chain(
            sales.models().iter().map(|model| estimated_cell(row.units_of(model), row.estimation)),
        ));
    }
    table
}

pub fn build_fleet_capacity_table(fleet_capacity: &FleetCapacityTable) -> Table {
    let mut table = new_table();
    table.set_header(
        std::iter::once("Year".to_owned())
            .chain(fleet_capacity.models().iter().map(|model| format!("{model} (MWh)")))
            .chain(std::iter::once("Total Capacity (MWh)".to_owned())),
    );
    for row in fleet_capacity.rows() {
        let capacities = fleet_capacity.models().iter().map(|model| {
            let capacity = row.capacities.get(model).copied().unwrap_or_default();
            estimated_cell(format!("{:.2}", capacity.0), row.estimation)
        });
        table.add_row(
            std::iter::once(year_cell(row.year, row.estimation)).chain(capacities).chain(
                std::iter::once(
                    estimated_cell(format!("{:.2}", row.total().0), row.estimation)
                        .fg(Color::Cyan),
                ),
            ),
        );
    }
    table
}

pub fn build_power_table(power: &PowerTable) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Year",
        "Power Potential (MW)",
        "Simple Cumulative (MW)",
        "Retirement Cumulative (MW)",
    ]);
    for row in power.rows() {
        table.add_row(vec![
            year_cell(row.year, row.estimation),
            estimated_cell(format!("{:.2}", row.power_potential.0), row.estimation),
            estimated_cell(format!("{:.2}", row.simple_cumulative.0), row.estimation),
            estimated_cell(format!("{:.2}", row.retirement_cumulative.0), row.estimation)
                .fg(Color::Green),
        ]);
    }
    table
}

pub fn build_supercharger_table(sites: &[Supercharger]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Name",
        "Lat",
        "Lon",
        "Stalls",
        "Power",
        "Status",
        "Annual Consumption (MWh)",
    ]);
    for site in sites {
        let is_operational = site.status == "Operational";
        table.add_row(vec![
            Cell::new(&site.name),
            Cell::new(format!("{:.2}", site.latitude)).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.2}", site.longitude)).add_attribute(Attribute::Dim),
            Cell::new(site.n_stalls).set_alignment(CellAlignment::Right),
            Cell::new(site.power).set_alignment(CellAlignment::Right),
            Cell::new(&site.status).fg(if is_operational {
                Color::Green
            } else {
                Color::DarkYellow
            }),
            Cell::new(format!("{:.0}", site.annual_consumption().0))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
