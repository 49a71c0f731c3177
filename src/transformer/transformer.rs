use super::{Chain, TransformError};

/// A reversible mapping between two types.
///
/// `forward` runs on the write path (caller value towards the backend) and
/// `backward` on the read path. For any input `x`,
/// `backward(forward(x)?)` must give back `x`.
pub trait Transformer: Send + Sync {
    type Input;
    type Output;

    fn forward(&self, input: &Self::Input) -> Result<Self::Output, TransformError>;

    fn backward(&self, output: Self::Output) -> Result<Self::Input, TransformError>;

    /// Name reported in [`TransformError::Failed`].
    fn stage(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Compose with `next`: forward runs `self` then `next`, backward runs
    /// `next` then `self`.
    fn append<N>(self, next: N) -> Chain<Self, N>
    where
        Self: Sized,
        N: Transformer<Input = Self::Output>,
    {
        Chain::new(self, next)
    }
}

impl<T: Transformer + ?Sized> Transformer for Box<T> {
    type Input = T::Input;
    type Output = T::Output;

    fn forward(&self, input: &Self::Input) -> Result<Self::Output, TransformError> {
        (**self).forward(input)
    }

    fn backward(&self, output: Self::Output) -> Result<Self::Input, TransformError> {
        (**self).backward(output)
    }

    fn stage(&self) -> &'static str {
        (**self).stage()
    }
}
