use crate::{algebra::*, solver::core::SettingsError};
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Rule used to choose the blocking constraint in the ratio test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RatiotestStrategy {
    /// Smallest step, ties broken by pivot magnitude then index
    #[default]
    Textbook,
    /// Harris two pass test against bounds relaxed by the
    /// feasibility tolerance, preferring large pivots
    TwoPass,
}

/// Rule used to choose the constraint released from the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PricingStrategy {
    /// Most violated multiplier
    #[default]
    Dantzig,
    /// Most violated multiplier, normalized by the norm of the
    /// corresponding edge direction
    SteepestEdge,
}

/// Settings for the active-set QP solver.
///
/// Construct with [`DefaultSettingsBuilder`] to get build-time
/// validation, or start from `DefaultSettings::default()` and check
/// the result with [`validate`](DefaultSettings::validate).

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    ///primal feasibility tolerance
    #[builder(default = "(1e-7).as_T()")]
    pub feasibility_tol: T,

    ///tolerance on the reduced gradient and on multiplier signs
    #[builder(default = "(1e-7).as_T()")]
    pub optimality_tol: T,

    ///smallest pivot accepted by the ratio test and by the
    ///working set factorization
    #[builder(default = "(1e-9).as_T()")]
    pub pivot_tol: T,

    ///curvature `p'Qp` at or below this value is treated as zero
    #[builder(default = "(1e-10).as_T()")]
    pub curvature_tol: T,

    ///maximum number of iterations, including the feasibility phase
    #[builder(default = "10_000")]
    pub iteration_limit: u32,

    ///maximum run time (seconds)
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///number of incremental gradient updates between full recomputes
    #[builder(default = "100")]
    pub gradient_recompute_frequency: u32,

    ///enable bound perturbation against degeneracy
    #[builder(default = "true")]
    pub perturb: bool,

    ///size of bound perturbations relative to the feasibility tolerance
    #[builder(default = "(10.).as_T()")]
    pub perturb_factor: T,

    ///enable data scaling
    #[builder(default = "true")]
    pub scale: bool,

    ///maximum scaling passes
    #[builder(default = "20")]
    pub scale_max_iter: u32,

    ///scaling stops once every pass factor is within `1 ± scale_tol`
    #[builder(default = "(0.1).as_T()")]
    pub scale_tol: T,

    ///minimum scaling factor allowed per pass
    #[builder(default = "(1e-4).as_T()")]
    pub scale_min: T,

    ///maximum scaling factor allowed per pass
    #[builder(default = "(1e+4).as_T()")]
    pub scale_max: T,

    ///ratio test rule
    #[builder(default = "RatiotestStrategy::Textbook")]
    pub ratiotest: RatiotestStrategy,

    ///pricing rule
    #[builder(default = "PricingStrategy::Dantzig")]
    pub pricing: PricingStrategy,

    ///consecutive recovery attempts before giving up with a numerical error
    #[builder(default = "3")]
    pub max_recovery_attempts: u32,

    ///verbose printing
    #[builder(default = "true")]
    pub verbose: bool,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.  Tolerances and factors
    /// must be positive and finite and the scaling bounds ordered.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_positive(self.feasibility_tol, "feasibility_tol")?;
        check_positive(self.optimality_tol, "optimality_tol")?;
        check_positive(self.pivot_tol, "pivot_tol")?;
        check_positive(self.curvature_tol, "curvature_tol")?;
        check_positive(self.perturb_factor, "perturb_factor")?;
        check_positive(self.scale_tol, "scale_tol")?;
        check_positive(self.scale_min, "scale_min")?;
        check_positive(self.scale_max, "scale_max")?;
        validate_scale_range(self.scale_min, self.scale_max)?;
        validate_time_limit(self.time_limit)?;
        if self.gradient_recompute_frequency == 0 {
            return Err(SettingsError::BadFieldValue("gradient_recompute_frequency"));
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    /// check the fields that have been explicitly set
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positives = [
            (self.feasibility_tol, "feasibility_tol"),
            (self.optimality_tol, "optimality_tol"),
            (self.pivot_tol, "pivot_tol"),
            (self.curvature_tol, "curvature_tol"),
            (self.perturb_factor, "perturb_factor"),
            (self.scale_tol, "scale_tol"),
            (self.scale_min, "scale_min"),
            (self.scale_max, "scale_max"),
        ];
        for (value, name) in positives {
            if let Some(v) = value {
                check_positive(v, name)?;
            }
        }
        if let (Some(lo), Some(hi)) = (self.scale_min, self.scale_max) {
            validate_scale_range(lo, hi)?;
        }
        if let Some(t) = self.time_limit {
            validate_time_limit(t)?;
        }
        if self.gradient_recompute_frequency == Some(0) {
            return Err(SettingsError::BadFieldValue("gradient_recompute_frequency"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn check_positive<T: FloatT>(v: T, name: &'static str) -> Result<(), SettingsError> {
    if v > T::zero() && v.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::NotPositive(name))
    }
}

fn validate_scale_range<T: FloatT>(lo: T, hi: T) -> Result<(), SettingsError> {
    if lo <= T::one() && T::one() <= hi {
        Ok(())
    } else {
        Err(SettingsError::Inconsistent("scale_min", "scale_max"))
    }
}

fn validate_time_limit(t: f64) -> Result<(), SettingsError> {
    if t.is_nan() || t < 0.0 {
        Err(SettingsError::BadFieldValue("time_limit"))
    } else {
        Ok(())
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = DefaultSettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(settings.iteration_limit, 10_000);
    assert_eq!(settings.feasibility_tol, 1e-7);
    assert_eq!(settings.ratiotest, RatiotestStrategy::Textbook);
    assert!(settings.validate().is_ok());

    // fail on nonpositive tolerances
    assert!(DefaultSettingsBuilder::<f64>::default()
        .pivot_tol(0.0)
        .build()
        .is_err());
    assert!(DefaultSettingsBuilder::<f64>::default()
        .feasibility_tol(f64::NAN)
        .build()
        .is_err());

    // fail on a scaling range that excludes one
    assert!(DefaultSettingsBuilder::<f64>::default()
        .scale_min(2.0)
        .scale_max(1e4)
        .build()
        .is_err());

    // fail on a zero recompute frequency
    assert!(DefaultSettingsBuilder::<f64>::default()
        .gradient_recompute_frequency(0)
        .build()
        .is_err());

    // directly construct a bad DefaultSettings and manually check
    let settings = DefaultSettings::<f64> {
        time_limit: -1.0,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("time_limit"))
    );

    let settings = DefaultSettings::<f64> {
        optimality_tol: -1e-8,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::NotPositive("optimality_tol"))
    );
}
