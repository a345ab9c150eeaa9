//! Locate command - Map a table position to a cell or storage slot

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section},
    geometry::{BoardGeometry, WorldPoint},
};

#[derive(Parser, Debug)]
#[command(about = "Show which cell or storage slot a table position falls in")]
pub struct LocateArgs {
    /// Position along x, in millimetres
    #[arg(long, allow_hyphen_values = true)]
    pub x: f64,

    /// Position along z, in millimetres
    #[arg(long, allow_hyphen_values = true)]
    pub z: f64,
}

pub fn execute(args: LocateArgs) -> Result<()> {
    let geometry = BoardGeometry::default();
    let point = WorldPoint::new(args.x, args.z);

    print_section(&format!("Position x={} z={}", args.x, args.z));

    let zone = if geometry.is_in_play_zone(point) {
        "play"
    } else if geometry.is_in_storage_zone(point) {
        "storage"
    } else {
        "outside"
    };
    print_kv("Zone", zone);

    match geometry.position_to_cell(point) {
        Some(cell) => print_kv("Cell", &cell.to_string()),
        None => print_kv("Cell", "-"),
    }
    match geometry.position_to_storage_slot(point) {
        Some(slot) => print_kv("Storage slot", &slot.to_string()),
        None => print_kv("Storage slot", "-"),
    }
    if let Some(center) = geometry.snap(point) {
        print_kv("Snapped to", &format!("x={:.1} z={:.1}", center.x, center.z));
    }
    Ok(())
}
