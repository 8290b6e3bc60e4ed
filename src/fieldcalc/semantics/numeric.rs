//! Scalar numeric routines
//!
//! Domain restrictions are not checked: `asin(2)` or `log(-1)` produce NaN
//! and that NaN flows on as data.

use super::builtins::ScalarFn;

impl ScalarFn {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            ScalarFn::Sin => x.sin(),
            ScalarFn::Cos => x.cos(),
            ScalarFn::Tan => x.tan(),
            ScalarFn::Asin => x.asin(),
            ScalarFn::Acos => x.acos(),
            ScalarFn::Atan => x.atan(),
            ScalarFn::Sinh => x.sinh(),
            ScalarFn::Cosh => x.cosh(),
            ScalarFn::Tanh => x.tanh(),
            ScalarFn::Asinh => x.asinh(),
            ScalarFn::Acosh => x.acosh(),
            ScalarFn::Atanh => x.atanh(),
            ScalarFn::Sqrt => x.sqrt(),
            ScalarFn::Sqr => x * x,
            ScalarFn::Log => x.ln(),
            ScalarFn::Log10 => x.log10(),
            ScalarFn::Exp => x.exp(),
            ScalarFn::Erf => libm::erf(x),
            ScalarFn::Erfc => libm::erfc(x),
            ScalarFn::Lgamma => libm::lgamma(x),
            ScalarFn::BesselJ0 => libm::j0(x),
            ScalarFn::BesselJ1 => libm::j1(x),
            ScalarFn::BesselY0 => libm::y0(x),
            ScalarFn::BesselY1 => libm::y1(x),
            ScalarFn::Sign => {
                if x >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            ScalarFn::Pos => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ScalarFn::Neg => {
                if x < 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ScalarFn::Abs => x.abs(),
            ScalarFn::Floor => x.floor(),
            ScalarFn::Ceil => x.ceil(),
            ScalarFn::Round => x.round(),
        }
    }
}

/// Floating-point remainder; the result takes the sign of the dividend,
/// like C `fmod`.
pub fn modulo(dividend: f64, divisor: f64) -> f64 {
    dividend % divisor
}
