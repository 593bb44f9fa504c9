// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw corpus text to tensor batches.
//
// The pipeline flows in this order:
//
//   .txt corpus files
//       │
//       ▼
//   TextLoader        → reads files, one sentence per line
//       │
//       ▼
//   Normalizer        → cleans and lowercases each line
//       │
//       ▼
//   Vocabulary        → top-V frequency ids, <s> </s> <unk>
//       │
//       ▼
//   encode + flatten  → one flat token-id sequence per split
//       │
//       ▼
//   build_windows     → (N context ids, target id) rows
//       │
//       ▼
//   WindowDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   WindowBatcher     → stacks rows into [B, N] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Bengio et al. (2003) §2 (data preparation)

/// Loads plain-text corpus files, one sentence per line
pub mod loader;

/// Cleans and lowercases raw corpus lines
pub mod normalizer;

/// Frequency-ranked closed vocabulary with reserved ids
pub mod vocab;

/// Slides the fixed-width context window over id sequences
pub mod windows;

/// Implements Burn's Dataset trait for window rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle + split into train/validation sentences
pub mod splitter;
