// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn model code used for the
// fake-likelihood metric. Only this layer and the checkpoint
// loader in infra touch burn types.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - The rest of the pipeline sees a plain Classifier trait
//     and can be tested with a scripted double
//
// What's in this layer:
//
//   model.rs      — The transformer encoder architecture
//                   • Token + positional embeddings
//                   • Multi-head self-attention with padding mask
//                   • Feed-forward networks (GELU activation)
//                   • Layer normalisation, residual connections
//                   • [CLS] classification head
//
//   classifier.rs — The inference adapter
//                   Loads a model directory, tokenises input,
//                   runs the model, returns label probabilities
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Transformer encoder sequence classifier
pub mod model;

/// Classifier trait implementation on the NdArray backend
pub mod classifier;
