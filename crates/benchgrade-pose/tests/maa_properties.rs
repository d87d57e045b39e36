use std::io::Write;

use approx::assert_relative_eq;
use benchgrade_pose::{
    evaluate_files, evaluate_maa, linalg, CenterMap, DuplicatePolicy, PoseError, PoseEvalParams,
};

const HEADER: &str = "image_id,R00,R01,R02,R10,R11,R12,R20,R21,R22,T0,T1,T2";

fn rotation_zy(a: f64, b: f64) -> [[f64; 3]; 3] {
    let (sa, ca) = a.sin_cos();
    let (sb, cb) = b.sin_cos();
    let rz = [[ca, -sa, 0.0], [sa, ca, 0.0], [0.0, 0.0, 1.0]];
    let ry = [[cb, 0.0, sb], [0.0, 1.0, 0.0], [-sb, 0.0, cb]];
    linalg::mat_mul(&rz, &ry)
}

fn scene(num_points: usize) -> CenterMap {
    (0..num_points)
        .map(|i| {
            let t = i as f64;
            (
                format!("cam_{i:03}"),
                [(0.9 * t).cos() * 4.0, (0.9 * t).sin() * 3.0, 0.5 * t - 2.0],
            )
        })
        .collect()
}

fn transformed(map: &CenterMap, scale: f64, rotation: &[[f64; 3]; 3], t: [f64; 3]) -> CenterMap {
    map.iter()
        .map(|(id, p)| {
            let r = linalg::mat_vec(rotation, p);
            (
                id.clone(),
                [
                    scale * r[0] + t[0],
                    scale * r[1] + t[1],
                    scale * r[2] + t[2],
                ],
            )
        })
        .collect()
}

/// Write centers as a pose table with identity rotations, so that `T = -C`.
fn write_pose_table(centers: &[(&str, [f64; 3])]) -> Result<tempfile::NamedTempFile, std::io::Error> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "{HEADER}")?;
    for (id, c) in centers {
        writeln!(
            file,
            "{id},1,0,0,0,1,0,0,0,1,{},{},{}",
            -c[0], -c[1], -c[2]
        )?;
    }
    file.flush()?;
    Ok(file)
}

#[test]
fn identical_inputs_score_one() -> Result<(), PoseError> {
    let pred = scene(7);
    let result = evaluate_maa(&pred, &pred, &PoseEvalParams::default())?;
    assert_eq!(result.maa, 1.0);
    assert_eq!(result.num_common, 7);
    Ok(())
}

#[test]
fn maa_does_not_increase_when_threshold_shrinks() -> Result<(), PoseError> {
    let pred = scene(9);
    let mut gt = transformed(&pred, 1.5, &rotation_zy(0.4, -0.2), [1.0, 2.0, 3.0]);
    for (k, (_, p)) in gt.iter_mut().enumerate() {
        let jitter = 0.08 * k as f64;
        p[0] += jitter;
        p[2] -= 0.5 * jitter;
    }

    let mut previous = f64::INFINITY;
    for threshold in [4.0, 1.0, 0.5, 0.25, 0.1, 0.01] {
        let params = PoseEvalParams {
            threshold,
            ..Default::default()
        };
        let maa = evaluate_maa(&pred, &gt, &params)?.maa;
        assert!(maa <= previous, "threshold {threshold}: {maa} > {previous}");
        previous = maa;
    }
    Ok(())
}

#[test]
fn rotation_is_proper() -> Result<(), PoseError> {
    let pred = scene(6);
    let gt = transformed(&pred, 0.7, &rotation_zy(2.1, 0.9), [-5.0, 0.0, 1.0]);
    let result = evaluate_maa(&pred, &gt, &PoseEvalParams::default())?;

    let transform = result.transform.expect("transform found");
    assert_relative_eq!(linalg::determinant(&transform.rotation), 1.0, epsilon = 1e-9);
    assert_relative_eq!(transform.scale, 0.7, epsilon = 1e-9);
    assert_eq!(result.maa, 1.0);
    Ok(())
}

#[test]
fn scaling_predictions_is_compensated() -> Result<(), PoseError> {
    let pred = scene(6);
    let gt = transformed(&pred, 2.0, &rotation_zy(-0.3, 0.6), [0.5, 0.5, 0.5]);
    let base = evaluate_maa(&pred, &gt, &PoseEvalParams::default())?;

    for k in [1e-9, 1e-3, 0.1, 3.0, 25.0] {
        let scaled = transformed(&pred, k, &linalg::IDENTITY, [0.0; 3]);
        let result = evaluate_maa(&scaled, &gt, &PoseEvalParams::default())?;
        assert_eq!(result.maa, base.maa, "k = {k}");

        let s = base.transform.as_ref().expect("transform found").scale;
        let s_scaled = result.transform.expect("transform found").scale;
        assert_relative_eq!(s_scaled, s / k, max_relative = 1e-9);
    }
    Ok(())
}

#[test]
fn pose_files_with_shifted_ground_truth() -> Result<(), Box<dyn std::error::Error>> {
    let submission = write_pose_table(&[
        ("A", [0.0, 0.0, 0.0]),
        ("B", [1.0, 0.0, 0.0]),
        ("C", [0.0, 1.0, 0.0]),
    ])?;
    let ground_truth = write_pose_table(&[
        ("C", [10.0, 11.0, 10.0]),
        ("A", [10.0, 10.0, 10.0]),
        ("B", [11.0, 10.0, 10.0]),
    ])?;

    let result = evaluate_files(submission.path(), ground_truth.path(), &PoseEvalParams::default())?;
    assert_eq!(result.maa, 1.0);
    assert_eq!(result.num_common, 3);
    Ok(())
}

#[test]
fn pose_files_identical_triplet() -> Result<(), Box<dyn std::error::Error>> {
    let centers = [
        ("A", [0.0, 0.0, 0.0]),
        ("B", [1.0, 0.0, 0.0]),
        ("C", [0.0, 1.0, 0.0]),
    ];
    let submission = write_pose_table(&centers)?;
    let ground_truth = write_pose_table(&centers)?;

    let result = evaluate_files(submission.path(), ground_truth.path(), &PoseEvalParams::default())?;
    assert_eq!(result.maa, 1.0);
    Ok(())
}

#[test]
fn blank_pose_row_is_scored_as_outlier() -> Result<(), Box<dyn std::error::Error>> {
    let centers = [
        ("A", [0.0, 0.0, 0.0]),
        ("B", [1.0, 0.0, 0.0]),
        ("C", [0.0, 1.0, 0.0]),
        ("D", [0.0, 0.0, 1.0]),
    ];
    let ground_truth = write_pose_table(&centers)?;

    let mut submission = tempfile::NamedTempFile::new()?;
    writeln!(submission, "{HEADER}")?;
    writeln!(submission, "A,1,0,0,0,1,0,0,0,1,0,0,0")?;
    writeln!(submission, "B,1,0,0,0,1,0,0,0,1,-1,0,0")?;
    writeln!(submission, "C,1,0,0,0,1,0,0,0,1,0,-1,0")?;
    writeln!(submission, "D,,0,0,0,1,0,0,0,1,0,0,-1")?;
    submission.flush()?;

    let result = evaluate_files(submission.path(), ground_truth.path(), &PoseEvalParams::default())?;
    assert_eq!(result.num_common, 4);
    assert_eq!(result.num_inliers, 3);
    assert_relative_eq!(result.maa, 0.75);
    Ok(())
}

#[test]
fn pose_files_validation() -> Result<(), Box<dyn std::error::Error>> {
    let good = write_pose_table(&[("A", [0.0; 3])])?;

    let mut bad = tempfile::NamedTempFile::new()?;
    writeln!(bad, "image_id,T0,T1,T2")?;
    writeln!(bad, "A,0,0,0")?;
    bad.flush()?;

    let res = evaluate_files(good.path(), bad.path(), &PoseEvalParams::default());
    assert!(matches!(res, Err(PoseError::MissingColumns { table, .. }) if table == "ground truth"));

    let res = evaluate_files("/definitely/not/here.csv", good.path(), &PoseEvalParams::default());
    assert!(matches!(res, Err(PoseError::Io(_))));

    let duplicated = write_pose_table(&[("A", [0.0; 3]), ("A", [1.0, 0.0, 0.0])])?;
    let params = PoseEvalParams {
        duplicates: DuplicatePolicy::Reject,
        ..Default::default()
    };
    let res = evaluate_files(duplicated.path(), good.path(), &params);
    assert!(matches!(res, Err(PoseError::DuplicateId { .. })));
    Ok(())
}
