use super::{TransformError, Transformer};

/// Two transformers run in sequence. Built with [`Transformer::append`].
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn forward(&self, input: &A::Input) -> Result<B::Output, TransformError> {
        let intermediate = self.first.forward(input)?;
        self.second.forward(&intermediate)
    }

    fn backward(&self, output: B::Output) -> Result<A::Input, TransformError> {
        let intermediate = self.second.backward(output)?;
        self.first.backward(intermediate)
    }

    fn stage(&self) -> &'static str {
        "chain"
    }
}
