use std::collections::BTreeMap;

use benchgrade_io::{IoError, Table};

use crate::{error::PoseError, linalg};

/// Name of the identifier column of a pose table.
pub const ID_COLUMN: &str = "image_id";

/// Row-major names of the rotation columns of a pose table.
pub const ROTATION_COLUMNS: [&str; 9] = [
    "R00", "R01", "R02", "R10", "R11", "R12", "R20", "R21", "R22",
];

/// Names of the translation columns of a pose table.
pub const TRANSLATION_COLUMNS: [&str; 3] = ["T0", "T1", "T2"];

/// Camera centers keyed by image identifier, iterated in identifier order.
pub type CenterMap = BTreeMap<String, [f64; 3]>;

/// A camera pose read from one row of a pose table.
///
/// The pose maps world coordinates to camera coordinates: `x_cam = R * x_world + T`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    /// Image identifier.
    pub image_id: String,
    /// Rotation matrix, row-major.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl PoseRecord {
    /// Position of the camera in world coordinates, `C = -R^T * T`.
    pub fn camera_center(&self) -> [f64; 3] {
        let c = linalg::mat_vec(&linalg::transpose(&self.rotation), &self.translation);
        [-c[0], -c[1], -c[2]]
    }
}

/// What to do when an identifier appears more than once in a pose table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The last row with a given identifier replaces the earlier ones.
    #[default]
    LastWins,
    /// A repeated identifier is a format error.
    Reject,
}

/// Check that a table has every column of the pose schema.
///
/// # Arguments
///
/// * `table` - The loaded table.
/// * `name` - Human readable name of the table used in the error, e.g. `"submission"`.
pub fn validate_pose_table(table: &Table, name: &str) -> Result<(), PoseError> {
    let required = std::iter::once(ID_COLUMN)
        .chain(ROTATION_COLUMNS)
        .chain(TRANSLATION_COLUMNS)
        .collect::<Vec<_>>();

    let missing = table.missing_columns(&required);
    if !missing.is_empty() {
        return Err(PoseError::MissingColumns {
            table: name.to_string(),
            columns: missing.into_iter().map(String::from).collect(),
        });
    }

    Ok(())
}

/// Read every row of a validated pose table as a [`PoseRecord`].
///
/// A blank pose cell reads as NaN: the row still loads, but its camera center is
/// never an inlier.
pub fn pose_records(table: &Table) -> Result<Vec<PoseRecord>, PoseError> {
    let ids = table.column(ID_COLUMN)?;
    let rotation_cols = ROTATION_COLUMNS
        .iter()
        .map(|name| pose_column(table, name))
        .collect::<Result<Vec<_>, _>>()?;
    let translation_cols = TRANSLATION_COLUMNS
        .iter()
        .map(|name| pose_column(table, name))
        .collect::<Result<Vec<_>, _>>()?;

    let records = ids
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            let mut rotation = [[0.0; 3]; 3];
            for (k, col) in rotation_cols.iter().enumerate() {
                rotation[k / 3][k % 3] = col[row];
            }
            PoseRecord {
                image_id: id.to_string(),
                rotation,
                translation: [
                    translation_cols[0][row],
                    translation_cols[1][row],
                    translation_cols[2][row],
                ],
            }
        })
        .collect();

    Ok(records)
}

fn pose_column(table: &Table, name: &str) -> Result<Vec<f64>, IoError> {
    table
        .column(name)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell.trim() {
            "" => Ok(f64::NAN),
            value => value.parse::<f64>().map_err(|_| IoError::InvalidValue {
                column: name.to_string(),
                row,
                value: cell.to_string(),
                expected: "a number",
            }),
        })
        .collect()
}

/// Build the map from image identifier to camera center.
pub fn camera_centers(
    records: &[PoseRecord],
    policy: DuplicatePolicy,
    name: &str,
) -> Result<CenterMap, PoseError> {
    let mut centers = CenterMap::new();
    for record in records {
        let previous = centers.insert(record.image_id.clone(), record.camera_center());
        if previous.is_some() {
            match policy {
                DuplicatePolicy::LastWins => {
                    log::warn!(
                        "{}: duplicate image_id {}, keeping the last row",
                        name,
                        record.image_id
                    );
                }
                DuplicatePolicy::Reject => {
                    return Err(PoseError::DuplicateId {
                        table: name.to_string(),
                        id: record.image_id.clone(),
                    });
                }
            }
        }
    }

    Ok(centers)
}

/// Compute the camera centers of a pose table.
///
/// The table is expected to have passed [`validate_pose_table`]; a missing column
/// surfaces here as an [`IoError::MissingColumn`].
pub fn centers_from_table(
    table: &Table,
    policy: DuplicatePolicy,
    name: &str,
) -> Result<CenterMap, PoseError> {
    let records = pose_records(table)?;
    camera_centers(&records, policy, name)
}
