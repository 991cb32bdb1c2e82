use gfx_maths::*;

use super::SurfaceError;

/// Largest number of control points along one axis of a patch.
pub const MAX_NET_SIZE: u32 = 1024;

/// Binomial coefficient `n` over `k`, zero when `k > n`.
///
/// Returns `None` if the coefficient does not fit into a `u64`.
pub fn choose(n: u32, k: u32) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);

    let mut res: u64 = 1;
    for i in 1..=u64::from(k) {
        // exact: res * (n - i + 1) is always divisible by i
        let next = u128::from(res) * u128::from(u64::from(n) - i + 1) / u128::from(i);
        res = u64::try_from(next).ok()?;
    }
    Some(res)
}

fn choose_approx(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * f64::from(n - k + i) / f64::from(i))
}

/// Bernstein basis polynomial `B(n, i, t)` for `i <= n`.
pub fn bernstein(n: u32, i: u32, t: f32) -> f32 {
    let coefficient = match choose(n, i) {
        Some(exact) => exact as f64,
        None => choose_approx(n, i),
    };
    let t = f64::from(t);
    (coefficient * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)) as f32
}

/// Tensor-product Bezier patch over a `n_us` x `n_vs` control net.
///
/// Control point `(i, j)` lives at `ctrl_pts[i * n_vs + j]`, `i` running
/// along `u` and `j` along `v`.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSurface {
    n_us: u32,
    n_vs: u32,
    ctrl_pts: Vec<Vec3>,
}

impl BezierSurface {
    pub fn new(n_us: u32, n_vs: u32, ctrl_pts: Vec<Vec3>) -> Result<Self, SurfaceError> {
        let expected = n_us as usize * n_vs as usize;
        if n_us == 0 || n_vs == 0 || ctrl_pts.len() != expected {
            return Err(SurfaceError::InvalidSurfaceDefinition {
                n_us,
                n_vs,
                points: ctrl_pts.len(),
            });
        }
        if n_us > MAX_NET_SIZE || n_vs > MAX_NET_SIZE {
            return Err(SurfaceError::ControlNetTooLarge { n_us, n_vs });
        }

        Ok(Self {
            n_us,
            n_vs,
            ctrl_pts,
        })
    }

    pub fn n_us(&self) -> u32 {
        self.n_us
    }

    pub fn n_vs(&self) -> u32 {
        self.n_vs
    }

    pub fn ctrl_pts(&self) -> &[Vec3] {
        &self.ctrl_pts
    }

    /// Point on the patch at `(u, v)`. Both parameters are expected in `[0, 1]`.
    pub fn evaluate(&self, u: f32, v: f32) -> Vec3 {
        let (deg_u, deg_v) = (self.n_us - 1, self.n_vs - 1);
        let v_weights: Vec<f32> = (0..self.n_vs).map(|j| bernstein(deg_v, j, v)).collect();

        let mut point = Vec3::zero();
        for i in 0..self.n_us {
            let u_weight = bernstein(deg_u, i, u);
            let row = &self.ctrl_pts[(i * self.n_vs) as usize..((i + 1) * self.n_vs) as usize];
            for (ctrl_pt, v_weight) in row.iter().zip(&v_weights) {
                point += *ctrl_pt * (u_weight * v_weight);
            }
        }
        point
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    fn grid(n_us: u32, n_vs: u32) -> Vec<Vec3> {
        (0..n_us)
            .flat_map(|i| {
                (0..n_vs).map(move |j| Vec3::new(i as f32, j as f32, (i * j) as f32 * 0.5))
            })
            .collect()
    }

    #[test]
    fn test_choose() {
        assert_eq!(choose(0, 0), Some(1));
        assert_eq!(choose(5, 2), Some(10));
        assert_eq!(choose(10, 3), Some(120));
        assert_eq!(choose(3, 4), Some(0));
        assert_eq!(choose(60, 30), Some(118_264_581_564_861_424));
        assert_eq!(choose(67, 33), Some(14_226_520_737_620_288_370));
        // C(68, 34) is larger than u64::MAX
        assert_eq!(choose(68, 34), None);
        assert_eq!(choose(68, 1), Some(68));

        for n in 0..=20 {
            for k in 0..=n {
                assert_eq!(choose(n, k), choose(n, n - k), "C({}, {})", n, k);
            }
        }
    }

    #[test]
    fn test_bernstein_partition_of_unity() {
        for &t in &[0.0, 0.2, 0.5, 0.9, 1.0] {
            let sum: f32 = (0..=4).map(|i| bernstein(4, i, t)).sum();
            assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-6));
        }
        assert_eq!(bernstein(3, 1, 0.5), 0.375);
    }

    #[test]
    fn test_bernstein_high_degree() {
        let sum: f32 = (0..=99).map(|i| bernstein(99, i, 0.5)).sum();
        assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-5));
        assert_eq!(bernstein(99, 99, 1.0), 1.0);
        assert_eq!(bernstein(99, 0, 1.0), 0.0);
    }

    #[test]
    fn test_evaluate_long_net() -> Result<(), SurfaceError> {
        // evenly spaced control points reproduce the straight line
        let pts: Vec<Vec3> = (0..70).map(|j| Vec3::new(0.0, j as f32, 0.0)).collect();
        let surface = BezierSurface::new(1, 70, pts)?;

        let mid = surface.evaluate(0.0, 0.5);
        assert!(approx_eq!(f32, mid.y, 34.5, epsilon = 1e-3));
        assert_eq!(surface.evaluate(0.0, 1.0), Vec3::new(0.0, 69.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_evaluate_corners() -> Result<(), SurfaceError> {
        let pts = grid(4, 3);
        let surface = BezierSurface::new(4, 3, pts.clone())?;

        assert_eq!(surface.evaluate(0.0, 0.0), pts[0]);
        assert_eq!(surface.evaluate(1.0, 1.0), pts[pts.len() - 1]);
        assert_eq!(surface.evaluate(0.0, 1.0), pts[2]);
        assert_eq!(surface.evaluate(1.0, 0.0), pts[9]);
        Ok(())
    }

    #[test]
    fn test_evaluate_bilinear() -> Result<(), SurfaceError> {
        let surface = BezierSurface::new(
            2,
            2,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 2.0, 4.0),
            ],
        )?;

        let mid = surface.evaluate(0.5, 0.5);
        assert!(approx_eq!(f32, mid.x, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, mid.y, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, mid.z, 1.0, epsilon = 1e-6));

        let p = surface.evaluate(0.25, 0.75);
        assert!(approx_eq!(f32, p.x, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, 1.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.z, 0.75, epsilon = 1e-6));
        Ok(())
    }

    #[test]
    fn test_invalid_definition() {
        assert!(matches!(
            BezierSurface::new(2, 2, grid(2, 1)),
            Err(SurfaceError::InvalidSurfaceDefinition {
                n_us: 2,
                n_vs: 2,
                points: 2
            })
        ));
        assert!(BezierSurface::new(0, 3, Vec::new()).is_err());

        let too_long = MAX_NET_SIZE + 1;
        assert!(matches!(
            BezierSurface::new(1, too_long, grid(1, too_long)),
            Err(SurfaceError::ControlNetTooLarge { n_us: 1, .. })
        ));
    }
}
