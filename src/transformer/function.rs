use std::fmt;

use super::{TransformError, Transformer};

type ForwardFn<I, O> = Box<dyn Fn(&I) -> Result<O, TransformError> + Send + Sync>;
type BackwardFn<I, O> = Box<dyn Fn(O) -> Result<I, TransformError> + Send + Sync>;

/// A transformer made from a pair of closures.
///
/// ```
/// use persist_rust::{FnTransformer, TransformError, Transformer};
///
/// let celsius = FnTransformer::new(
///     "celsius",
///     |f: &f64| Ok((f - 32.0) / 1.8),
///     |c: f64| Ok(c * 1.8 + 32.0),
/// );
/// assert_eq!(celsius.forward(&212.0).unwrap(), 100.0);
/// ```
pub struct FnTransformer<I, O> {
    stage: &'static str,
    forward: ForwardFn<I, O>,
    backward: BackwardFn<I, O>,
}

impl<I, O> FnTransformer<I, O> {
    pub fn new<F, B>(stage: &'static str, forward: F, backward: B) -> Self
    where
        F: Fn(&I) -> Result<O, TransformError> + Send + Sync + 'static,
        B: Fn(O) -> Result<I, TransformError> + Send + Sync + 'static,
    {
        Self {
            stage,
            forward: Box::new(forward),
            backward: Box::new(backward),
        }
    }
}

impl<I, O> fmt::Debug for FnTransformer<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransformer")
            .field("stage", &self.stage)
            .finish()
    }
}

impl<I, O> Transformer for FnTransformer<I, O> {
    type Input = I;
    type Output = O;

    fn forward(&self, input: &I) -> Result<O, TransformError> {
        (self.forward)(input)
    }

    fn backward(&self, output: O) -> Result<I, TransformError> {
        (self.backward)(output)
    }

    fn stage(&self) -> &'static str {
        self.stage
    }
}
