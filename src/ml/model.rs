// ============================================================
// Layer 5 — NPLM Architecture
// ============================================================
// The fixed-context neural probabilistic language model of
// Bengio et al. (2003):
//
//   x = concat(embed(w_{t-N}), ..., embed(w_{t-1}))   [B, N*M]
//   h = tanh(H·x + d)                                 [B, H]
//   y = b + W·x + U·h                                 [B, V]
//
// W·x is the skip connection: a direct affine path from the
// concatenated embeddings to the output logits, bypassing the
// hidden layer. The output bias b lives on the skip path so the
// hidden-to-output projection carries no bias of its own.
//
// Training uses a sampled-softmax estimator (see sampled_loss);
// evaluation uses the exact full-softmax cross-entropy.
//
// Reference: Bengio et al. (2003) A Neural Probabilistic
//            Language Model, JMLR — eq. (1)
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::tanh,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct NplmConfig {
    /// V — vocabulary size, special tokens included
    pub vocab_size: usize,
    /// N — number of context tokens fed to the model
    pub window_size: usize,
    /// M — embedding dimension per token
    pub embedding_dim: usize,
    /// H — hidden layer width
    pub hidden_dim: usize,
}

impl NplmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> NplmModel<B> {
        let concat_dim = self.window_size * self.embedding_dim;

        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let hidden = LinearConfig::new(concat_dim, self.hidden_dim).init(device);
        // Output bias lives on the skip path (see module header)
        let hidden_out = LinearConfig::new(self.hidden_dim, self.vocab_size)
            .with_bias(false)
            .init(device);
        let skip_out = LinearConfig::new(concat_dim, self.vocab_size).init(device);

        NplmModel {
            embedding,
            hidden,
            hidden_out,
            skip_out,
            window_size: self.window_size,
            embedding_dim: self.embedding_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct NplmModel<B: Backend> {
    pub embedding: Embedding<B>,
    pub hidden: Linear<B>,
    pub hidden_out: Linear<B>,
    pub skip_out: Linear<B>,
    pub window_size: usize,
    pub embedding_dim: usize,
}

impl<B: Backend> NplmModel<B> {
    /// contexts: [batch, N] → concatenated embeddings [batch, N*M]
    /// and hidden activations [batch, H].
    fn embed_and_hide(&self, contexts: Tensor<B, 2, Int>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, n] = contexts.dims();
        let embedded = self.embedding.forward(contexts); // [batch, N, M]
        let x = embedded.reshape([batch_size, n * self.embedding_dim]);
        let h = tanh(self.hidden.forward(x.clone()));
        (x, h)
    }

    /// contexts: [batch, N] → logits over the vocabulary [batch, V]
    pub fn forward(&self, contexts: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let (x, h) = self.embed_and_hide(contexts);
        self.hidden_out.forward(h) + self.skip_out.forward(x)
    }

    /// Exact full-softmax cross-entropy — O(V) per example, so
    /// evaluation only, never the training objective.
    pub fn forward_loss(
        &self,
        contexts: Tensor<B, 2, Int>,
        targets: Tensor<B, 1, Int>,
    ) -> Tensor<B, 1> {
        let logits = self.forward(contexts);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        ce.forward(logits, targets)
    }

    /// Sampled-softmax training loss.
    ///
    /// Instead of normalising over all V classes, the softmax is
    /// taken over a small candidate set shared by the batch: the
    /// batch's own targets plus `noise_ids` ids drawn uniformly
    /// by the caller. Row i's label is its own target at column
    /// i, every other column acts as a negative. Only the
    /// selected output-weight columns participate, which is what
    /// keeps the gradient cheap for large V.
    ///
    /// A noise id that collides with some row's target simply
    /// duplicates a column; the estimator tolerates it, as common
    /// implementations do.
    pub fn sampled_loss(
        &self,
        contexts: Tensor<B, 2, Int>,
        targets: Tensor<B, 1, Int>,
        noise_ids: Tensor<B, 1, Int>,
    ) -> Tensor<B, 1> {
        let [batch_size, _] = contexts.dims();
        let device = contexts.device();
        let (x, h) = self.embed_and_hide(contexts);

        // Candidate columns: batch targets first, then noise.
        let candidates = Tensor::cat(vec![targets, noise_ids], 0); // [B+K]

        // Select only the candidate columns of both output paths.
        // weight shape is [d_input, V], so dim 1 is the class dim.
        let hidden_w = self.hidden_out.weight.val().select(1, candidates.clone());
        let skip_w = self.skip_out.weight.val().select(1, candidates.clone());

        let mut logits = h.matmul(hidden_w) + x.matmul(skip_w); // [B, B+K]
        if let Some(bias) = &self.skip_out.bias {
            logits = logits + bias.val().select(0, candidates).unsqueeze::<2>();
        }

        // Row i's target sits at column i by construction.
        let labels = Tensor::<B, 1, Int>::arange(0..batch_size as i64, &device);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&device);
        ce.forward(logits, labels)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn tiny_model() -> (NplmModel<TestBackend>, burn::backend::ndarray::NdArrayDevice) {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = NplmConfig::new(20, 3, 4, 5).init::<TestBackend>(&device);
        (model, device)
    }

    #[test]
    fn test_forward_logit_shape() {
        let (model, device) = tiny_model();
        let contexts = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3, 4, 5].as_slice(), &device,
        ).reshape([2, 3]);
        let logits = model.forward(contexts);
        assert_eq!(logits.dims(), [2, 20]);
    }

    #[test]
    fn test_full_loss_is_finite_and_positive() {
        let (model, device) = tiny_model();
        let contexts = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3, 4, 5].as_slice(), &device,
        ).reshape([2, 3]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([7, 9].as_slice(), &device);
        let loss: f64 = model.forward_loss(contexts, targets).into_scalar().elem();
        assert!(loss.is_finite());
        // Cross-entropy of a softmax is never negative
        assert!(loss >= 0.0);
    }

    #[test]
    fn test_sampled_loss_is_finite() {
        let (model, device) = tiny_model();
        let contexts = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3, 4, 5].as_slice(), &device,
        ).reshape([2, 3]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([7, 9].as_slice(), &device);
        let noise = Tensor::<TestBackend, 1, Int>::from_ints([1, 4, 11, 7].as_slice(), &device);
        let loss: f64 = model.sampled_loss(contexts, targets, noise).into_scalar().elem();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }
}
