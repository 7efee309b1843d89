//! EFloat

use crate::pbrt::{max, next_float_down, next_float_up, Float, MACHINE_EPSILON};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A `Float` that carries a conservative interval `[low, high]` known to
/// contain the exact result of the computation that produced it. Every
/// operation rounds the interval outward by one ulp.
///
/// Debug builds additionally track the value in 64-bit precision and assert
/// that it stays inside the interval.
#[derive(Copy, Clone, Debug, Default)]
pub struct EFloat {
    /// The computed value.
    v: Float,

    /// The lower bound on `v`.
    low: Float,

    /// The upper bound on `v`.
    high: Float,

    /// 64-bit precision value corresponding to `v`.
    #[cfg(debug_assertions)]
    v_precise: f64,
}

impl EFloat {
    /// Construct a new float with symmetric error bounds.
    ///
    /// * `v`   - The value.
    /// * `err` - The absolute error; 0 for an exact value.
    pub fn new(v: Float, err: Float) -> Self {
        if err == 0.0 {
            Self::interval(v, v, v, v as f64)
        } else {
            // Rounding outward is over-conservative when v ± err is
            // representable, which is acceptable.
            Self::interval(v, next_float_down(v - err), next_float_up(v + err), v as f64)
        }
    }

    /// Construct a new float with error bounds and a separately computed
    /// 64-bit value. The 64-bit value is ignored in release builds.
    ///
    /// * `v`       - The value.
    /// * `precise` - The 64-bit value.
    /// * `err`     - The absolute error.
    pub fn precise(v: Float, precise: f64, err: Float) -> Self {
        let r = Self::new(v, err);
        Self::interval(v, r.low, r.high, precise)
    }

    fn interval(v: Float, low: Float, high: Float, precise: f64) -> Self {
        #[cfg(not(debug_assertions))]
        let _ = precise;

        let r = Self {
            v,
            low,
            high,
            #[cfg(debug_assertions)]
            v_precise: precise,
        };
        r.check();
        r
    }

    #[cfg(debug_assertions)]
    fn check(&self) {
        if self.low.is_finite() && self.high.is_finite() {
            debug_assert!(self.low <= self.high, "inverted interval {:?}", self);
        }
        if self.v.is_finite() {
            debug_assert!(self.low as f64 <= self.v_precise, "lower bound > v_precise {:?}", self);
            debug_assert!(self.v_precise <= self.high as f64, "v_precise > upper bound {:?}", self);
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check(&self) {}

    /// Returns the computed value.
    pub fn value(&self) -> Float {
        self.v
    }

    /// Returns the lower bound on the exact value.
    pub fn lower_bound(&self) -> Float {
        self.low
    }

    /// Returns the upper bound on the exact value.
    pub fn upper_bound(&self) -> Float {
        self.high
    }

    /// Returns the largest distance from the value to either bound.
    pub fn absolute_error(&self) -> Float {
        next_float_up(max((self.high - self.v).abs(), (self.v - self.low).abs()))
    }

    /// Returns the 64-bit precision value.
    #[cfg(debug_assertions)]
    pub fn precise_value(&self) -> f64 {
        self.v_precise
    }

    /// Returns the relative error of the value against the 64-bit value.
    #[cfg(debug_assertions)]
    pub fn relative_error(&self) -> Float {
        ((self.v_precise - self.v as f64) / self.v_precise).abs() as Float
    }

    #[cfg(debug_assertions)]
    fn precise_or(&self, _v: f64) -> f64 {
        self.v_precise
    }

    #[cfg(not(debug_assertions))]
    fn precise_or(&self, v: f64) -> f64 {
        v
    }

    /// Returns the square root. The interval must not be negative.
    pub fn sqrt(&self) -> Self {
        Self::interval(
            self.v.sqrt(),
            next_float_down(self.low.sqrt()),
            next_float_up(self.high.sqrt()),
            self.precise_or(0.0).sqrt(),
        )
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        if self.low >= 0.0 {
            *self
        } else if self.high <= 0.0 {
            -*self
        } else {
            Self::interval(
                self.v.abs(),
                0.0,
                max(-self.low, self.high),
                self.precise_or(0.0).abs(),
            )
        }
    }
}

impl From<Float> for EFloat {
    /// Converts an exact value.
    fn from(v: Float) -> Self {
        Self::new(v, 0.0)
    }
}

impl From<EFloat> for Float {
    fn from(ef: EFloat) -> Float {
        ef.v
    }
}

impl PartialEq for EFloat {
    /// Compares the computed values only.
    fn eq(&self, other: &Self) -> bool {
        self.v == other.v
    }
}

impl Add for EFloat {
    type Output = Self;

    fn add(self, ef: EFloat) -> Self::Output {
        Self::interval(
            self.v + ef.v,
            next_float_down(self.low + ef.low),
            next_float_up(self.high + ef.high),
            self.precise_or(0.0) + ef.precise_or(0.0),
        )
    }
}

impl Sub for EFloat {
    type Output = Self;

    fn sub(self, ef: EFloat) -> Self::Output {
        Self::interval(
            self.v - ef.v,
            next_float_down(self.low - ef.high),
            next_float_up(self.high - ef.low),
            self.precise_or(0.0) - ef.precise_or(0.0),
        )
    }
}

impl Mul for EFloat {
    type Output = Self;

    fn mul(self, ef: EFloat) -> Self::Output {
        let prod = [
            self.low * ef.low,
            self.high * ef.low,
            self.low * ef.high,
            self.high * ef.high,
        ];
        Self::interval(
            self.v * ef.v,
            next_float_down(prod[0].min(prod[1]).min(prod[2].min(prod[3]))),
            next_float_up(prod[0].max(prod[1]).max(prod[2].max(prod[3]))),
            self.precise_or(0.0) * ef.precise_or(0.0),
        )
    }
}

impl Div for EFloat {
    type Output = Self;

    /// Divides by an interval. If the divisor straddles zero the result is
    /// the whole real line.
    fn div(self, ef: EFloat) -> Self::Output {
        let (low, high) = if ef.low < 0.0 && ef.high > 0.0 {
            (-Float::INFINITY, Float::INFINITY)
        } else {
            let quot = [
                self.low / ef.low,
                self.high / ef.low,
                self.low / ef.high,
                self.high / ef.high,
            ];
            (
                next_float_down(quot[0].min(quot[1]).min(quot[2].min(quot[3]))),
                next_float_up(quot[0].max(quot[1]).max(quot[2].max(quot[3]))),
            )
        };
        Self::interval(self.v / ef.v, low, high, self.precise_or(0.0) / ef.precise_or(1.0))
    }
}

impl Neg for EFloat {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::interval(-self.v, -self.high, -self.low, -self.precise_or(0.0))
    }
}

/// Implements an operator between `EFloat` and an exact `Float` in both
/// operand orders by promoting the `Float`.
macro_rules! mixed_ops {
    ($op: ident, $f: ident) => {
        impl $op<Float> for EFloat {
            type Output = EFloat;

            fn $f(self, v: Float) -> EFloat {
                $op::$f(self, EFloat::from(v))
            }
        }

        impl $op<EFloat> for Float {
            type Output = EFloat;

            fn $f(self, ef: EFloat) -> EFloat {
                $op::$f(EFloat::from(self), ef)
            }
        }
    };
}

mixed_ops!(Add, add);
mixed_ops!(Sub, sub);
mixed_ops!(Mul, mul);
mixed_ops!(Div, div);

/// Implements a quadratic equation solver.
pub struct Quadratic {}

impl Quadratic {
    /// Solve the quadratic equation `a·t² + b·t + c = 0` with error bounds.
    /// Returns the roots in ascending order, or `None` if there are no real
    /// roots.
    ///
    /// * `a` - Coefficient of t² term.
    /// * `b` - Coefficient of t term.
    /// * `c` - Coefficient of constant term.
    pub fn solve_efloat(a: EFloat, b: EFloat, c: EFloat) -> Option<(EFloat, EFloat)> {
        // The discriminant is evaluated in double precision so that nearly
        // tangent rays are not rejected spuriously.
        let (av, bv, cv) = (a.v as f64, b.v as f64, c.v as f64);
        let discrim = bv * bv - 4.0 * av * cv;
        if discrim < 0.0 {
            return None;
        }

        let root_discrim = discrim.sqrt() as Float;
        let root_discrim = EFloat::new(root_discrim, MACHINE_EPSILON * root_discrim);

        // Pick the sign that avoids cancellation between b and the root.
        let q = if b.v < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };

        let t0 = q / a;
        let t1 = c / q;
        if t0.low > t1.low {
            Some((t1, t0))
        } else {
            Some((t0, t1))
        }
    }

    /// Solve the quadratic equation `a·t² + b·t + c = 0` in plain floats.
    /// Returns the roots in ascending order, or `None` if there are no real
    /// roots.
    ///
    /// * `a` - Coefficient of t² term.
    /// * `b` - Coefficient of t term.
    /// * `c` - Coefficient of constant term.
    pub fn solve_float(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
        let (a, b, c) = (a as f64, b as f64, c as f64);
        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 {
            return None;
        }

        let root_discrim = discrim.sqrt();
        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };

        let t0 = (q / a) as Float;
        let t1 = (c / q) as Float;
        if t0 > t1 {
            Some((t1, t0))
        } else {
            Some((t0, t1))
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
