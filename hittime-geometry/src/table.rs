//! The immutable PMT lookup table.

use crate::error::{Error, Result};
use crate::parser::{read_manufacturer_table, read_position_table};
use hittime_core::{PmtKind, Vec3};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The set of description files a table is built from.
///
/// Any file may be absent; the table then simply has no data of that
/// class. At least one file must be present.
#[derive(Debug, Clone, Default)]
pub struct GeometryFiles {
    /// Position table for large PMTs.
    pub large_positions: Option<PathBuf>,
    /// Position table for small PMTs.
    pub small_positions: Option<PathBuf>,
    /// Manufacturer table for large PMTs.
    pub large_manufacturers: Option<PathBuf>,
    /// Manufacturer table for small PMTs.
    pub small_manufacturers: Option<PathBuf>,
}

impl GeometryFiles {
    /// Conventional file names under a geometry directory.
    const LARGE_POSITIONS: &'static str = "positions_large.csv";
    const SMALL_POSITIONS: &'static str = "positions_small.csv";
    const LARGE_MANUFACTURERS: &'static str = "manufacturers_large.csv";
    const SMALL_MANUFACTURERS: &'static str = "manufacturers_small.csv";

    /// Picks up the conventional file names that exist under `dir`.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };
        Self {
            large_positions: existing(Self::LARGE_POSITIONS),
            small_positions: existing(Self::SMALL_POSITIONS),
            large_manufacturers: existing(Self::LARGE_MANUFACTURERS),
            small_manufacturers: existing(Self::SMALL_MANUFACTURERS),
        }
    }

    /// Returns true if no file is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.large_positions.is_none()
            && self.small_positions.is_none()
            && self.large_manufacturers.is_none()
            && self.small_manufacturers.is_none()
    }
}

/// Summary counts over a table, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Number of id slots (max id + 1).
    pub slots: usize,
    /// Ids with a known position.
    pub with_position: usize,
    /// Ids of each kind.
    pub large: usize,
    /// Ids of each kind.
    pub small: usize,
    /// Ids per manufacturer tag, sorted by tag.
    pub manufacturers: BTreeMap<String, usize>,
}

/// Dense id-indexed PMT lookup table.
///
/// Covers ids `0..=max_id` over all description files; ids without a
/// record, and ids past the end of the table, look up as `None`. A
/// missing position is never substituted with the origin. Built once,
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PmtTable {
    kinds: Vec<Option<PmtKind>>,
    manufacturers: Vec<Option<String>>,
    positions: Vec<Option<Vec3>>,
}

impl PmtTable {
    /// Loads a table from description files.
    ///
    /// Positions are derived from the angular coordinates at the given
    /// surface radius. The table is sized by the maximum id observed
    /// across ALL files, so a manufacturer record can extend the id range
    /// even without a matching position record.
    ///
    /// # Errors
    /// Fails on the first unreadable or malformed file, or when `files`
    /// is empty.
    pub fn load(files: &GeometryFiles, pmt_radius_mm: f64) -> Result<Self> {
        if files.is_empty() {
            return Err(Error::NoGeometryFiles);
        }

        let mut positions = Vec::new();
        for (path, kind) in [
            (&files.large_positions, PmtKind::Large),
            (&files.small_positions, PmtKind::Small),
        ] {
            if let Some(path) = path {
                let records = read_position_table(path)?;
                debug!(
                    "read {} {} position records from {}",
                    records.len(),
                    kind,
                    path.display()
                );
                positions.push((kind, records));
            }
        }

        let mut manufacturers = Vec::new();
        for path in [&files.large_manufacturers, &files.small_manufacturers]
            .into_iter()
            .flatten()
        {
            let records = read_manufacturer_table(path)?;
            debug!(
                "read {} manufacturer records from {}",
                records.len(),
                path.display()
            );
            manufacturers.push(records);
        }

        let max_id = positions
            .iter()
            .flat_map(|(_, records)| records.iter().map(|r| r.id))
            .chain(
                manufacturers
                    .iter()
                    .flat_map(|records| records.iter().map(|r| r.id)),
            )
            .max();
        let slots = max_id.map_or(0, |id| id as usize + 1);

        let mut table = Self {
            kinds: vec![None; slots],
            manufacturers: vec![None; slots],
            positions: vec![None; slots],
        };
        for (kind, records) in positions {
            for record in records {
                let idx = record.id as usize;
                table.kinds[idx] = Some(kind);
                table.positions[idx] = Some(Vec3::from_spherical_deg(
                    pmt_radius_mm,
                    record.theta_deg,
                    record.phi_deg,
                ));
            }
        }
        for records in manufacturers {
            for record in records {
                table.manufacturers[record.id as usize] = Some(record.tag);
            }
        }
        Ok(table)
    }

    /// Number of id slots in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if the table has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Kind of the PMT with the given id, `None` if unknown.
    #[must_use]
    pub fn kind(&self, id: u32) -> Option<PmtKind> {
        self.kinds.get(id as usize).copied().flatten()
    }

    /// Manufacturer tag of the PMT with the given id, `None` if unknown.
    #[must_use]
    pub fn manufacturer(&self, id: u32) -> Option<&str> {
        self.manufacturers
            .get(id as usize)
            .and_then(|tag| tag.as_deref())
    }

    /// Position of the PMT with the given id, `None` if unknown.
    #[must_use]
    pub fn position(&self, id: u32) -> Option<Vec3> {
        self.positions.get(id as usize).copied().flatten()
    }

    /// Kinds for a batch of ids. Empty input yields empty output.
    #[must_use]
    pub fn kinds(&self, ids: &[u32]) -> Vec<Option<PmtKind>> {
        ids.iter().map(|&id| self.kind(id)).collect()
    }

    /// Manufacturer tags for a batch of ids. Empty input yields empty output.
    #[must_use]
    pub fn manufacturers(&self, ids: &[u32]) -> Vec<Option<&str>> {
        ids.iter().map(|&id| self.manufacturer(id)).collect()
    }

    /// Positions for a batch of ids. Empty input yields empty output.
    #[must_use]
    pub fn positions(&self, ids: &[u32]) -> Vec<Option<Vec3>> {
        ids.iter().map(|&id| self.position(id)).collect()
    }

    /// Summary counts for reporting.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            slots: self.len(),
            ..TableStats::default()
        };
        for kind in self.kinds.iter().flatten() {
            match kind {
                PmtKind::Large => stats.large += 1,
                PmtKind::Small => stats.small += 1,
            }
        }
        stats.with_position = self.positions.iter().flatten().count();
        for tag in self.manufacturers.iter().flatten() {
            *stats.manufacturers.entry(tag.clone()).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn geometry_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, content: &str| {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(content.as_bytes()).unwrap();
        };
        write(
            "positions_large.csv",
            "# id x y z theta phi\n\
             0 0 0 0 0.0 0.0\n\
             1 0 0 0 90.0 0.0\n\
             4 0 0 0 90.0 90.0\n",
        );
        write(
            "positions_small.csv",
            "# id x y z theta phi\n\
             20 0 0 0 180.0 0.0\n",
        );
        write(
            "manufacturers_large.csv",
            "# id manufacturer\n0 hamamatsu\n1 nnvt\n4 hamamatsu\n",
        );
        write("manufacturers_small.csv", "# id manufacturer\n20 hzc\n21 hzc\n");
        dir
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = geometry_dir();
        let files = GeometryFiles::from_dir(dir.path());
        let table = PmtTable::load(&files, 19500.0).unwrap();

        // Max id over all files (21 comes from a manufacturer file only).
        assert_eq!(table.len(), 22);

        assert_eq!(table.kind(0), Some(PmtKind::Large));
        assert_eq!(table.kind(20), Some(PmtKind::Small));
        assert_eq!(table.manufacturer(1), Some("nnvt"));
        assert_eq!(table.manufacturer(21), Some("hzc"));

        let pos = table.position(0).unwrap();
        assert_relative_eq!(pos.z, 19500.0);
        let pos = table.position(1).unwrap();
        assert_relative_eq!(pos.x, 19500.0, epsilon = 1e-6);

        // 21 has a manufacturer but no position record.
        assert_eq!(table.kind(21), None);
        assert_eq!(table.position(21), None);
    }

    #[test]
    fn test_unknown_ids_stay_unknown() {
        let dir = geometry_dir();
        let table = PmtTable::load(&GeometryFiles::from_dir(dir.path()), 19500.0).unwrap();

        // Sparse id inside the covered range.
        assert_eq!(table.kind(2), None);
        assert_eq!(table.manufacturer(2), None);
        assert_eq!(table.position(2), None);

        // Ids past the table end, including the auxiliary range.
        for id in [22, 1000, 50_000, 400_000] {
            assert_eq!(table.kind(id), None);
            assert_eq!(table.manufacturer(id), None);
            assert_eq!(table.position(id), None);
        }
    }

    #[test]
    fn test_batch_lookups_preserve_shape() {
        let dir = geometry_dir();
        let table = PmtTable::load(&GeometryFiles::from_dir(dir.path()), 19500.0).unwrap();

        assert!(table.kinds(&[]).is_empty());
        assert!(table.positions(&[]).is_empty());

        let kinds = table.kinds(&[0, 2, 20]);
        assert_eq!(kinds, vec![Some(PmtKind::Large), None, Some(PmtKind::Small)]);

        let tags = table.manufacturers(&[0, 3]);
        assert_eq!(tags, vec![Some("hamamatsu"), None]);
    }

    #[test]
    fn test_stats() {
        let dir = geometry_dir();
        let table = PmtTable::load(&GeometryFiles::from_dir(dir.path()), 19500.0).unwrap();
        let stats = table.stats();
        assert_eq!(stats.slots, 22);
        assert_eq!(stats.large, 3);
        assert_eq!(stats.small, 1);
        assert_eq!(stats.with_position, 4);
        assert_eq!(stats.manufacturers.get("hamamatsu"), Some(&2));
        assert_eq!(stats.manufacturers.get("hzc"), Some(&2));
    }

    #[test]
    fn test_no_files_is_an_error() {
        let files = GeometryFiles::default();
        assert!(matches!(
            PmtTable::load(&files, 19500.0),
            Err(Error::NoGeometryFiles)
        ));
    }

    #[test]
    fn test_from_dir_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut file =
            std::fs::File::create(dir.path().join("positions_large.csv")).unwrap();
        file.write_all(b"0 0 0 0 45.0 45.0\n").unwrap();

        let files = GeometryFiles::from_dir(dir.path());
        assert!(files.large_positions.is_some());
        assert!(files.small_positions.is_none());

        let table = PmtTable::load(&files, 19500.0).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.manufacturer(0), None);
    }
}
