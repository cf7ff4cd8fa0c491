use super::*;
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::timers::Timers;
use std::io::Write;
use std::time::Duration;

impl<T> ConfigurablePrintTarget for DefaultInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

macro_rules! expformat {
    ($fmt:expr,$val:expr) => {
        if $val.is_finite() {
            _exp_str_reformat(format!($fmt, $val))
        } else {
            format!($fmt, $val)
        }
    };
}

const RULE: &str = "---------------------------------------------------------------------------";

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    pub(crate) fn print_banner(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }
        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;
        writeln!(
            out,
            "        quass v{}  -  primal active-set QP solver",
            crate::VERSION
        )?;
        writeln!(out, "{}", RULE)?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_configuration(
        &mut self,
        settings: &DefaultSettings<T>,
        instance: &Instance<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;
        let nequal = (0..instance.num_total())
            .filter(|&i| instance.is_equality(i))
            .count();

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", instance.num_var)?;
        writeln!(out, "  constraints   = {}", instance.num_con)?;
        writeln!(out, "  equalities    = {}", nequal)?;
        writeln!(
            out,
            "  nnz(Q)        = {} ({})",
            instance.Q.nnz(),
            instance.Q.format_name()
        )?;
        writeln!(
            out,
            "  nnz(A)        = {} ({})",
            instance.A.nnz(),
            instance.A.format_name()
        )?;
        writeln!(out,)?;

        self.print_settings(settings)?;

        std::io::Result::Ok(())
    }

    pub(crate) fn print_status_header(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        //print a subheader for the iterations info
        write!(out, "iter  ")?;
        write!(out, "ph  ")?;
        write!(out, "objective     ")?;
        write!(out, "pinf      ")?;
        write!(out, "dinf      ")?;
        write!(out, "nullsp  ")?;
        write!(out, "active  ")?;
        write!(out, "step      ")?;
        writeln!(out,)?;
        writeln!(out, "{}", RULE)?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_status(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>4}  ", self.iterations)?;
        write!(out, "{:>2}  ", self.phase)?;
        write!(out, "{}  ", expformat!("{:+10.5e}", self.objective))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.primal_infeasibility))?;
        write!(out, "{}  ", expformat!("{:6.2e}", self.dual_infeasibility))?;
        write!(out, "{:>6}  ", self.nullspace_dim)?;
        write!(out, "{:>6}  ", self.num_active)?;

        if self.step_length.is_finite() && self.step_length > T::zero() {
            write!(out, "{}  ", expformat!("{:>.2e}", self.step_length))?;
        } else {
            write!(out, " ------   ")?;
        }

        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    pub(crate) fn print_phase_one(
        &mut self,
        settings: &DefaultSettings<T>,
        violation: T,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }
        let out = &mut self.stream;
        writeln!(
            out,
            "start point infeasible (max violation {}), entering phase 1",
            expformat!("{:.2e}", violation)
        )?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_recovery(
        &mut self,
        settings: &DefaultSettings<T>,
        reason: &str,
        dropped: usize,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }
        let out = &mut self.stream;
        writeln!(
            out,
            "  recovery at iteration {}: {} (refactorized, {} dropped)",
            self.iterations, reason, dropped
        )?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_footer(
        &mut self,
        settings: &DefaultSettings<T>,
        timers: &Timers,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(out, "{}", RULE)?;
        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(out, "iterations = {}", self.iterations)?;
        writeln!(
            out,
            "objective  = {}",
            expformat!("{:+.8e}", self.objective)
        )?;
        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;
        writeln!(out, "{}", RULE)?;
        timers.print(out)?;

        std::io::Result::Ok(())
    }

    fn print_settings(&mut self, settings: &DefaultSettings<T>) -> std::io::Result<()> {
        let out = &mut self.stream;

        let set = settings;

        writeln!(out, "settings:")?;

        writeln!(out, "  precision: {} bit", _get_precision_string::<T>())?;

        let time_lim_str = {
            if set.time_limit.is_infinite() {
                "Inf".to_string()
            } else {
                format!("{:?}", set.time_limit)
            }
        };
        writeln!(
            out,
            "  max iter = {}, time limit = {}",
            set.iteration_limit, time_lim_str
        )?;

        writeln!(
            out,
            "  feas tol = {:.1e}, opt tol = {:.1e}, pivot tol = {:.1e}",
            set.feasibility_tol, set.optimality_tol, set.pivot_tol
        )?;

        writeln!(
            out,
            "  ratio test: {:?}, pricing: {:?}",
            set.ratiotest, set.pricing
        )?;

        writeln!(
            out,
            "  perturb: {}, factor = {:.1e}",
            _bool_on_off(set.perturb),
            set.perturb_factor
        )?;

        writeln!(
            out,
            "  scaling: {}, min_scale = {:.1e}, max_scale = {:.1e}, max iter = {}",
            _bool_on_off(set.scale),
            set.scale_min,
            set.scale_max,
            set.scale_max_iter
        )?;

        writeln!(out,)?;

        std::io::Result::Ok(())
    }
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}

// convert a string in LowerExp display format into one that
// 1) always has a sign after the exponent, and
// 2) has at least two digits in the exponent.

fn _exp_str_reformat(mut thestr: String) -> String {
    let Some(eidx) = thestr.find('e') else {
        return thestr;
    };
    let has_sign = thestr[eidx + 1..].starts_with('-');

    let has_short_exp = {
        if !has_sign {
            thestr.len() == eidx + 2
        } else {
            thestr.len() == eidx + 3
        }
    };

    let chars = match (has_sign, has_short_exp) {
        (false, true) => "+0",
        (false, false) => "+",
        (true, true) => "0",
        (true, false) => "",
    };

    let shift = if has_sign { 2 } else { 1 };
    thestr.insert_str(eidx + shift, chars);
    thestr
}

#[test]
fn test_exp_str_reformat() {
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e-3)), "1.50e-03");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e3)), "1.50e+03");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e-13)), "1.50e-13");
    assert_eq!(_exp_str_reformat(format!("{:.2e}", 1.5e13)), "1.50e+13");
}
