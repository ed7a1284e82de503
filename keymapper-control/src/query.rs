//! Read-only queries that never touch the daemon
//!
//! Both listings print to the given writer and are meant to end the
//! invocation with status 0.

use crate::error::ControlError;
use evdev::{Device as EvdevDevice, Key};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding the evdev nodes
pub const INPUT_DEVICES_PATH: &str = "/dev/input";

/// Highest key or button code defined by the kernel
const KEY_MAX: u16 = 0x2ff;

/// Special mapping target that swallows the input
pub const DISABLE_NAME: &str = "disable";

/// All event nodes that belong to one physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGroup {
    pub name: String,
    pub paths: Vec<PathBuf>,
}

/// Scan `dir` for `event*` nodes and group them by device name
///
/// Groups keep the order in which their first node was found, nodes are
/// visited in path order. A missing directory is an empty listing.
pub fn scan_devices(dir: &Path) -> Result<Vec<DeviceGroup>, ControlError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ControlError::DeviceScan(e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(ControlError::DeviceScan)?.path();
        let is_event_node = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with("event"));
        if is_event_node {
            paths.push(path);
        }
    }
    paths.sort();

    let mut groups: Vec<DeviceGroup> = Vec::new();
    for path in paths {
        let device = match EvdevDevice::open(&path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let name = device.name().unwrap_or("Unknown Device").to_string();

        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.paths.push(path),
            None => groups.push(DeviceGroup {
                name,
                paths: vec![path],
            }),
        }
    }

    Ok(groups)
}

/// Print the present input devices, one line per device
pub fn list_devices<W: Write>(out: &mut W) -> Result<(), ControlError> {
    let groups = scan_devices(Path::new(INPUT_DEVICES_PATH))?;
    write_devices(out, &groups)?;
    Ok(())
}

fn write_devices<W: Write>(out: &mut W, groups: &[DeviceGroup]) -> io::Result<()> {
    for group in groups {
        let paths: Vec<String> = group
            .paths
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        writeln!(out, "{}: {}", group.name, paths.join(", "))?;
    }
    out.flush()
}

/// Every symbolic key and button name the mapping layer recognizes, in code
/// order, followed by [`DISABLE_NAME`]
pub fn key_names() -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for code in 0..=KEY_MAX {
        let name = format!("{:?}", Key::new(code));
        // evdev prints unassigned codes as a description, not a name
        if !(name.starts_with("KEY_") || name.starts_with("BTN_")) {
            continue;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names.push(DISABLE_NAME.to_string());
    names
}

/// Print [`key_names`], one per line
pub fn list_key_names<W: Write>(out: &mut W) -> Result<(), ControlError> {
    for name in key_names() {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_key_names_in_code_order() {
        let names = key_names();

        let position = |name: &str| names.iter().position(|n| n == name);
        let esc = position("KEY_ESC").unwrap();
        let a = position("KEY_A").unwrap();
        let f24 = position("KEY_F24").unwrap();

        // KEY_ESC = 1, KEY_A = 30, KEY_F24 = 194
        assert!(esc < a);
        assert!(a < f24);
        assert!(names.iter().any(|name| name.starts_with("BTN_")));
        assert_eq!(names.last().map(String::as_str), Some(DISABLE_NAME));
    }

    #[test]
    fn test_key_names_are_unique() {
        let names = key_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn test_missing_input_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let groups = scan_devices(&temp_dir.path().join("input")).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_unopenable_nodes_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        // regular files fail the evdev ioctls
        std::fs::write(temp_dir.path().join("event0"), b"").unwrap();
        std::fs::write(temp_dir.path().join("mouse0"), b"").unwrap();

        let groups = scan_devices(temp_dir.path()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_device_lines() {
        let groups = vec![
            DeviceGroup {
                name: "Razer BlackWidow".to_string(),
                paths: vec![
                    PathBuf::from("/dev/input/event3"),
                    PathBuf::from("/dev/input/event4"),
                ],
            },
            DeviceGroup {
                name: "Logitech USB Receiver".to_string(),
                paths: vec![PathBuf::from("/dev/input/event7")],
            },
        ];

        let mut out: Vec<u8> = Vec::new();
        write_devices(&mut out, &groups).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Razer BlackWidow: /dev/input/event3, /dev/input/event4\n\
             Logitech USB Receiver: /dev/input/event7\n"
        );
    }

    #[test]
    fn test_list_key_names_output() {
        let mut out: Vec<u8> = Vec::new();
        list_key_names(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|line| line == "KEY_A"));
        assert!(text.ends_with("disable\n"));
    }
}
