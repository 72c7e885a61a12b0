//! # Stylekit Core
//!
//! Responsive style resolution and CSS composition for a visual page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                stylekit-core                │
//! ├─────────────────────────────────────────────┤
//! │  Style Bags      │  Resolution              │
//! │  - Aliases       │  - Breakpoint fallback   │
//! │  - Legacy merge  │  - Declared defaults     │
//! │  - Linked boxes  │  - Flags                 │
//! ├─────────────────────────────────────────────┤
//! │  Composition     │  Element Stylesheets     │
//! │  - Shadow/filter │  - Module schemas        │
//! │  - Transform     │  - State selectors       │
//! │  - Shorthands    │  - Scoped !important     │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Editing Intents         │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bag;
pub mod box_model;
pub mod breakpoint;
pub mod color;
pub mod composite;
pub mod document;
pub mod error;
pub mod intent;
pub mod merge;
pub mod node;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod stylesheet;
pub mod value;

pub use bag::StyleBag;
pub use box_model::{clear_side, set_linked, set_side, sides, toggle_link, BoxGroup, Side};
pub use breakpoint::Breakpoint;
pub use composite::{
    build_composite, compose, inline_style, ComposeOptions, CompositeGroup, Declaration,
    ShadowFallback,
};
pub use document::Document;
pub use error::{StyleError, StyleResult};
pub use intent::{apply_action, ShadowPreset, StyleAction, StyleIntent};
pub use merge::{effective, merge, EffectiveStyleBag};
pub use node::{AdvancedSettings, Node, NodeId};
pub use render::{render_node, RenderConfig, RenderedNode};
pub use resolve::{resolve, resolve_flag, resolve_flag_key, resolve_number, resolve_text};
pub use schema::{ElementSpec, ElementState, ModuleSchema, SchemaRegistry};
pub use stylesheet::{build_stylesheet, ElementStyleMap};

/// Stylekit core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
