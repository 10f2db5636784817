// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The only layer that imports burn.
//
//   model.rs         — multi-layer network and tied autoencoder
//   layer_factory.rs — single-layer construction by layer type
//   trainer.rs       — fit passes (SGD / Adam)
//   listener.rs      — per-iteration score reporting

pub mod model;

pub mod layer_factory;

pub mod trainer;

pub mod listener;
