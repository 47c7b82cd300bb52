use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

/// Read the operator priorities file. Each line assigns a satellite a
/// priority and a favorite transmitter:
///
/// ```text
/// # norad  priority  transmitter uuid
/// 43017    1.        KgazZMKEa74VnquqXLwAvD
/// ```
///
/// Comments and malformed lines are skipped with a warning; a missing file
/// yields empty maps.
pub fn read_priorities(path: &Path) -> (HashMap<u32, f64>, HashMap<u32, String>) {
    let mut priorities = HashMap::new();
    let mut favorite_transmitters = HashMap::new();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("could not read priorities file {}: {}", path.display(), e);
            return (priorities, favorite_transmitters);
        }
    };

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            warn!("malformed priorities line, expected 3 fields but found {}", fields.len());
            continue;
        }

        match (fields[0].parse::<u32>(), fields[1].parse::<f64>()) {
            (Ok(norad_id), Ok(priority)) => {
                priorities.insert(norad_id, priority);
                favorite_transmitters.insert(norad_id, fields[2].to_string());
            }
            _ => warn!("malformed priorities line: {}", line),
        }
    }

    (priorities, favorite_transmitters)
}
