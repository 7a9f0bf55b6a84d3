use rand::Rng;
use serde_json::{json, Value};

use crate::planner::Grid;

/// Generates a unique correlation ID for request tracing.
pub fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

/// JSON form of a grid: the slot header plus one row per day.
pub fn grid_json(grid: &Grid) -> Value {
    json!({
        "slots": grid.slots(),
        "rows": grid.rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::project;

    #[test]
    fn test_correlation_ids_differ() {
        assert_ne!(generate_correlation_id(), generate_correlation_id());
    }

    #[test]
    fn test_grid_json_shape() {
        let grid = project(&[], &[], &["Monday".to_string()], &["09:00 to 10:30".to_string()]);
        let value = grid_json(&grid);

        assert_eq!(value["slots"][0], "09:00 to 10:30");
        assert_eq!(value["rows"][0]["day"], "Monday");
        assert_eq!(value["rows"][0]["cells"][0], "");
    }
}
