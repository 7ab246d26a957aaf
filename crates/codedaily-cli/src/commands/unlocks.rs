use codedaily_core::unlocks::{is_duration_selectable, DURATIONS};
use codedaily_core::View;
use serde::Serialize;

use super::{open_machine, print_json, print_snapshot};

#[derive(Serialize)]
struct DurationRow {
    label: &'static str,
    seconds: u64,
    selectable: bool,
}

pub fn durations() -> Result<(), Box<dyn std::error::Error>> {
    let machine = open_machine()?;
    let credits = machine.state().credits;
    let rows: Vec<DurationRow> = DURATIONS
        .iter()
        .map(|d| DurationRow {
            label: d.label,
            seconds: d.seconds,
            selectable: is_duration_selectable(d, credits),
        })
        .collect();
    Ok(print_json(&rows)?)
}

pub fn roadmap() -> Result<(), Box<dyn std::error::Error>> {
    let mut machine = open_machine()?;
    machine.navigate(View::Roadmap)?;
    Ok(print_snapshot(&machine)?)
}
