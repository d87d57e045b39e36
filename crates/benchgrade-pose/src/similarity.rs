use crate::linalg;

/// A similarity transform `x -> scale * rotation * x + translation`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityTransform {
    /// Isotropic scale, strictly positive.
    pub scale: f64,
    /// Proper rotation matrix (determinant +1).
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl SimilarityTransform {
    /// Apply the transform to a point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let rotated = linalg::mat_vec(&self.rotation, point);
        [
            self.scale * rotated[0] + self.translation[0],
            self.scale * rotated[1] + self.translation[1],
            self.scale * rotated[2] + self.translation[2],
        ]
    }

    /// Apply the transform to a set of points.
    ///
    /// PRECONDITION: dst_points is a pre-allocated slice of the same size as src_points.
    pub fn apply_points(&self, src_points: &[[f64; 3]], dst_points: &mut [[f64; 3]]) {
        assert_eq!(src_points.len(), dst_points.len());
        for (dst, src) in dst_points.iter_mut().zip(src_points.iter()) {
            *dst = self.apply(src);
        }
    }
}

/// Estimate the similarity transform mapping `src` onto `dst` (Umeyama).
///
/// The algorithm:
/// 1. Center both point sets on their centroids `mu_s`, `mu_d`.
/// 2. Compute the cross-covariance `H = Σ (src - mu_s) * (dst - mu_d)^T`.
/// 3. Compute the SVD `H = U * S * V^T` and the rotation `R = V * U^T`. If `R` is
///    a reflection, the last column of `V` is negated and `R` recomputed.
/// 4. Compute the scale `s = trace(R * H) / Σ |src - mu_s|^2`.
/// 5. Compute the translation `t = mu_d - s * R * mu_s`.
///
/// # Arguments
///
/// * `src` - Source points.
/// * `dst` - Destination points, paired by index with `src`.
///
/// # Returns
///
/// `None` when no proper similarity can be recovered: mismatched or empty inputs,
/// coincident source points, a non-positive scale or non-finite intermediate values.
///
/// For more details, see: Umeyama, S. "Least-squares estimation of transformation
/// parameters between two point patterns." IEEE PAMI, 1991.
pub fn umeyama_similarity(src: &[[f64; 3]], dst: &[[f64; 3]]) -> Option<SimilarityTransform> {
    if src.is_empty() || src.len() != dst.len() {
        return None;
    }

    let mu_s = linalg::centroid(src);
    let mu_d = linalg::centroid(dst);

    let mut h = [[0.0; 3]; 3];
    let mut src_spread = 0.0;
    let mut src_norm = 0.0;
    for (p, q) in src.iter().zip(dst.iter()) {
        let pc = linalg::sub(p, &mu_s);
        let qc = linalg::sub(q, &mu_d);
        for (r, &pc_r) in pc.iter().enumerate() {
            for (c, &qc_c) in qc.iter().enumerate() {
                h[r][c] += pc_r * qc_c;
            }
        }
        src_spread += pc[0] * pc[0] + pc[1] * pc[1] + pc[2] * pc[2];
        src_norm += p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
    }

    // all source points collapse onto their centroid, up to rounding at their magnitude
    if !(src_spread > f64::EPSILON * src_norm) || !linalg::is_finite(&h) {
        return None;
    }

    let h_mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| h[i][j]);
    let svd = h_mat.svd();
    let u = to_array33(svd.u());
    let mut v = to_array33(svd.v());

    let ut = linalg::transpose(&u);
    let mut rotation = linalg::mat_mul(&v, &ut);
    if linalg::determinant(&rotation) < 0.0 {
        for row in v.iter_mut() {
            row[2] = -row[2];
        }
        rotation = linalg::mat_mul(&v, &ut);
    }

    let scale = linalg::trace(&linalg::mat_mul(&rotation, &h)) / src_spread;
    if !scale.is_finite() || scale <= 0.0 || !linalg::is_finite(&rotation) {
        return None;
    }

    let rotated_mu_s = linalg::mat_vec(&rotation, &mu_s);
    let translation = [
        mu_d[0] - scale * rotated_mu_s[0],
        mu_d[1] - scale * rotated_mu_s[1],
        mu_d[2] - scale * rotated_mu_s[2],
    ];

    Some(SimilarityTransform {
        scale,
        rotation,
        translation,
    })
}

fn to_array33(m: faer::MatRef<'_, f64>) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = m.read(i, j);
        }
    }
    out
}
