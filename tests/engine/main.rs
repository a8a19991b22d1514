mod ask_tell;
mod bounds;
mod errors;
mod maximize;
mod observers;
mod probe;

use bayes_opt::{AcquisitionOptimizer, BayesianOptimization, OptimizerBuilder, Params};

type Peak = fn(&Params) -> Result<f64, String>;

/// Maximum 1.0 at (0, 1), which lies outside the x bounds used below.
fn peak(p: &Params) -> Result<f64, String> {
    Ok(-p["x"].powi(2) - (p["y"] - 1.0).powi(2) + 1.0)
}

/// Small search budget to keep the tests fast.
fn fast_acq_optimizer() -> AcquisitionOptimizer {
    AcquisitionOptimizer::builder()
        .n_warmup(300)
        .n_restarts(2)
        .max_local_iter(20)
        .build()
}

fn peak_builder() -> OptimizerBuilder<Peak> {
    BayesianOptimization::builder(peak as Peak, [("x", (2.0, 4.0)), ("y", (-3.0, 3.0))])
        .seed(1)
        .acquisition_optimizer(fast_acq_optimizer())
}
