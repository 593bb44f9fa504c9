// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns used by multiple layers:
//
//   checkpoint.rs  — Model weight saving/loading via Burn's
//                    CompactRecorder, plus the TrainConfig
//                    JSON round-trip so evaluation and
//                    sampling can rebuild the architecture.
//
//   vocab_store.rs — Vocabulary persistence. The id space
//                    baked into the checkpoint must be decoded
//                    with the same vocabulary it was trained
//                    with, so both live in the same directory.
//
//   metrics.rs     — Per-epoch metrics CSV (loss, perplexity,
//                    skipped batches) for learning curves.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary saving and loading
pub mod vocab_store;

/// Training metrics CSV logger
pub mod metrics;
