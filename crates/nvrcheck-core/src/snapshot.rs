// ── Device snapshot file ──
//
// `<dir>/<address without dots>.xml`, containing
// `<root><id{logicalId}>True|False</id{logicalId}>...</root>` with no XML
// declaration. A snapshot is written at most once: an existing file is
// never touched.
//
// The file name drops the dots from the textual address, so distinct
// addresses can collide (`1.0.0.11` and `10.0.1.1` both map to
// `10011.xml`). Consumers key on these names, so the scheme stays as is.
//
// Output is UTF-8 with no byte order mark. An empty device list renders as
// `<root/>`; other writers may emit `<root />`, which XML parsers treat the
// same way.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::Device;

pub const SNAPSHOT_EXTENSION: &str = "xml";
const ROOT_ELEMENT: &str = "root";
const ELEMENT_PREFIX: &str = "id";

/// What [`write_if_absent`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    AlreadyExists(PathBuf),
}

/// Snapshot file name for an address: `10.0.0.1` → `10001.xml`.
pub fn file_name(address: IpAddr) -> String {
    format!(
        "{}.{SNAPSHOT_EXTENSION}",
        address.to_string().replace('.', "")
    )
}

/// Full snapshot path for an address inside `dir`.
pub fn snapshot_path(dir: &Path, address: IpAddr) -> PathBuf {
    dir.join(file_name(address))
}

/// Directory of the running executable, the default snapshot location.
pub fn executable_dir() -> Result<PathBuf, CoreError> {
    let exe = std::env::current_exe().map_err(|e| CoreError::OutputDir {
        reason: format!("failed to resolve current executable: {e}"),
    })?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| CoreError::OutputDir {
            reason: format!("{} has no parent directory", exe.display()),
        })
}

/// Render the snapshot document for `devices`, in list order.
///
/// Fails if any device lacks a logical id.
pub fn render(devices: &[Device]) -> Result<String, CoreError> {
    let mut writer = Writer::new(Vec::new());

    if devices.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(ROOT_ELEMENT)))
            .map_err(xml_error)?;
    } else {
        writer
            .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
            .map_err(xml_error)?;

        for device in devices {
            let logical_id = device.logical_id().ok_or_else(|| CoreError::DeviceUnkeyed {
                device_id: device.id.clone(),
            })?;
            let name = format!("{ELEMENT_PREFIX}{logical_id}");

            writer
                .write_event(Event::Start(BytesStart::new(name.as_str())))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Text(BytesText::new(connected_text(device.connected))))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .map_err(xml_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
            .map_err(xml_error)?;
    }

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

/// Write the snapshot for `devices` to `path` unless a file is already there.
pub fn write_if_absent(path: &Path, devices: &[Device]) -> Result<WriteOutcome, CoreError> {
    if path.exists() {
        debug!(path = %path.display(), "snapshot already present, leaving it alone");
        return Ok(WriteOutcome::AlreadyExists(path.to_path_buf()));
    }

    let document = render(devices)?;

    let snapshot_error = |source| CoreError::Snapshot {
        path: path.to_path_buf(),
        source,
    };

    // create_new closes the gap between the existence check and the write.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(snapshot_error(e)),
    };
    file.write_all(document.as_bytes()).map_err(snapshot_error)?;
    file.flush().map_err(snapshot_error)?;

    info!(path = %path.display(), devices = devices.len(), "snapshot written");
    Ok(WriteOutcome::Written(path.to_path_buf()))
}

fn connected_text(connected: bool) -> &'static str {
    if connected { "True" } else { "False" }
}

fn xml_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::Xml {
        message: err.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Entity;

    fn camera(id: &str, logical_id: u32, connected: bool) -> Device {
        Device {
            id: id.into(),
            name: None,
            connected,
            entities: vec![Entity {
                logical_id: Some(logical_id),
            }],
        }
    }

    #[test]
    fn file_name_strips_dots() {
        assert_eq!(file_name(IpAddr::from([10, 0, 0, 1])), "10001.xml");
        assert_eq!(file_name(IpAddr::from([10, 0, 0, 11])), "100011.xml");
        assert_eq!(file_name(IpAddr::from([192, 168, 1, 20])), "192168120.xml");
    }

    #[test]
    fn file_name_collides_for_some_addresses() {
        assert_eq!(
            file_name(IpAddr::from([1, 0, 0, 11])),
            file_name(IpAddr::from([10, 0, 1, 1]))
        );
    }

    #[test]
    fn render_flat_document() {
        let xml = render(&[camera("a", 1, true), camera("b", 2, false)]).unwrap();
        insta::assert_snapshot!(xml, @"<root><id1>True</id1><id2>False</id2></root>");
        assert!(!xml.starts_with("<?xml"));
        assert!(!xml.starts_with('\u{feff}'));
    }

    #[test]
    fn render_keeps_list_order() {
        let xml = render(&[camera("z", 30, false), camera("a", 4, true)]).unwrap();
        assert_eq!(xml, "<root><id30>False</id30><id4>True</id4></root>");
    }

    #[test]
    fn render_empty_device_list() {
        assert_eq!(render(&[]).unwrap(), "<root/>");
    }

    #[test]
    fn render_rejects_unkeyed_device() {
        let mut unkeyed = camera("orphan", 0, true);
        unkeyed.entities.clear();
        let err = render(&[camera("a", 1, true), unkeyed]).unwrap_err();
        assert!(matches!(err, CoreError::DeviceUnkeyed { ref device_id } if device_id == "orphan"));
    }

    #[test]
    fn write_creates_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path(), IpAddr::from([10, 0, 0, 1]));

        let first = write_if_absent(&path, &[camera("a", 1, true)]).unwrap();
        assert_eq!(first, WriteOutcome::Written(path.clone()));

        let second = write_if_absent(&path, &[camera("a", 1, false)]).unwrap();
        assert_eq!(second, WriteOutcome::AlreadyExists(path.clone()));

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<root><id1>True</id1></root>"
        );
    }

    #[test]
    fn existing_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path(), IpAddr::from([10, 0, 0, 2]));
        std::fs::write(&path, "hand-edited").unwrap();

        let outcome = write_if_absent(&path, &[camera("a", 1, true)]).unwrap();

        assert_eq!(outcome, WriteOutcome::AlreadyExists(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hand-edited");
    }

    #[test]
    fn unkeyed_device_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = snapshot_path(dir.path(), IpAddr::from([10, 0, 0, 3]));
        let mut unkeyed = camera("orphan", 0, true);
        unkeyed.entities[0].logical_id = None;

        assert!(write_if_absent(&path, &[unkeyed]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_is_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("10001.xml");

        let err = write_if_absent(&path, &[camera("a", 1, true)]).unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
    }
}
