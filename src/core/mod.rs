pub mod estimator;

pub use estimator::CostEstimator;
