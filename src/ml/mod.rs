// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly, except the data
// layer's Dataset/Batcher impls.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - The model architecture is clearly separated from
//     data preparation and application logic
//
// What's in this layer:
//
//   model.rs   — The NPLM architecture (Bengio et al. 2003):
//                • Word embedding table (V×M)
//                • tanh hidden layer on the concatenated
//                  context embeddings (NM→H)
//                • Output projection (H→V) plus the
//                  embedding→output skip connection (NM→V)
//                • Full-softmax loss for evaluation
//                • Sampled-softmax loss for training
//
//   trainer.rs — The training loop: sampled loss, AdaGrad
//                steps, divergence guard, per-epoch validation
//                perplexity, checkpointing, metrics CSV
//
//   scorer.rs  — Exact cross-entropy → perplexity, with the
//                unknown-target-filtered variant
//
//   sampler.rs — Autoregressive sentence generation and
//                post-hoc log-probability re-scoring
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Bengio et al. (2003) A Neural Probabilistic
//            Language Model

/// The NPLM architecture and its two loss functions
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Perplexity scoring over window matrices
pub mod scorer;

/// Autoregressive sentence sampling
pub mod sampler;
