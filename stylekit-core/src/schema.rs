//! Element schemas: which inner elements of a module can be styled, under
//! which CSS selector, and in which interaction states.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{StyleError, StyleResult};

/// Interaction state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// Resting state.
    Normal,
    /// Pointer over the element.
    Hover,
    /// Keyboard focus.
    Focus,
    /// Application-level toggled state (open accordion, selected tab).
    Active,
}

impl ElementState {
    /// All states.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Hover, Self::Focus, Self::Active];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Active => "active",
        }
    }

    /// Selector suffixes for this state.
    ///
    /// `Active` is not the `:active` pseudo-class; it expands into three
    /// alternative selectors, each of which gets its own rule.
    #[must_use]
    pub const fn suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Normal => &[""],
            Self::Hover => &[":hover"],
            Self::Focus => &[":focus"],
            Self::Active => &[".active", ".is-active", "[aria-expanded=\"true\"]"],
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementState {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| StyleError::UnknownState(s.to_string()))
    }
}

fn default_states() -> Vec<ElementState> {
    vec![ElementState::Normal, ElementState::Hover]
}

/// One stylable element of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Key under `design.elements`.
    pub key: String,
    /// CSS selector, possibly several comma-separated fragments.
    pub selector: String,
    /// States in emission order. Defaults to normal and hover.
    #[serde(default = "default_states")]
    pub states: Vec<ElementState>,
    /// Property names offered by the editor; empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<String>,
}

impl ElementSpec {
    /// Create an element with the default normal/hover states.
    #[must_use]
    pub fn new(key: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            selector: selector.into(),
            states: default_states(),
            properties: Vec::new(),
        }
    }

    /// Replace the supported states.
    #[must_use]
    pub fn with_states(mut self, states: impl IntoIterator<Item = ElementState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// Trimmed, non-empty selector fragments.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.selector.split(',').map(str::trim).filter(|f| !f.is_empty())
    }

    /// Whether the element declares `state`.
    #[must_use]
    pub fn supports(&self, state: ElementState) -> bool {
        self.states.contains(&state)
    }
}

/// Ordered element list of one module type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSchema {
    /// Module type this schema applies to.
    pub module_type: String,
    /// Elements in declaration order.
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

impl ModuleSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element.
    #[must_use]
    pub fn with_element(mut self, element: ElementSpec) -> Self {
        self.elements.push(element);
        self
    }

    /// Look up an element by key.
    #[must_use]
    pub fn element(&self, key: &str) -> Option<&ElementSpec> {
        self.elements.iter().find(|e| e.key == key)
    }
}

const S_N: &[ElementState] = &[ElementState::Normal];
const S_NH: &[ElementState] = &[ElementState::Normal, ElementState::Hover];
const S_NA: &[ElementState] = &[ElementState::Normal, ElementState::Active];
const S_NHA: &[ElementState] = &[
    ElementState::Normal,
    ElementState::Hover,
    ElementState::Active,
];
const S_NHF: &[ElementState] = &[
    ElementState::Normal,
    ElementState::Hover,
    ElementState::Focus,
];
const S_NHAF: &[ElementState] = &[
    ElementState::Normal,
    ElementState::Hover,
    ElementState::Active,
    ElementState::Focus,
];

type BuiltinElement = (&'static str, &'static str, &'static [ElementState]);

static BUILTIN: &[(&str, &[BuiltinElement])] = &[
    (
        "toggle",
        &[
            ("header", ".tb-toggle-header", S_NHA),
            ("content", ".tb-toggle-content", S_N),
            ("icon", ".tb-toggle-icon", S_NA),
            ("item", ".tb-toggle-item", S_NH),
        ],
    ),
    (
        "accordion",
        &[
            ("header", ".tb-accordion-header", S_NHA),
            ("content", ".tb-accordion-content", S_N),
            ("icon", ".tb-accordion-icon", S_NA),
        ],
    ),
    (
        "tabs",
        &[
            ("nav", ".tb-tabs-nav", S_N),
            ("tab_button", ".tb-tab-btn", S_NHA),
            ("content", ".tb-tab-panel", S_N),
        ],
    ),
    ("button", &[("button", ".tb-button, .tb-btn", S_NHAF)]),
    (
        "text",
        &[("paragraph", "p", S_NH), ("link", "a", S_NHA)],
    ),
    (
        "heading",
        &[
            ("heading", "h1, h2, h3, h4, h5, h6", S_NH),
            ("underline", ".tb-heading-underline", S_NH),
        ],
    ),
    (
        "image",
        &[
            ("wrapper", ".tb-image", S_NH),
            ("container", ".tb-image-container", S_NH),
            ("image", ".tb-image-img", S_NH),
            ("caption", ".tb-image-caption", S_NH),
            ("overlay", ".tb-image-overlay", S_NH),
        ],
    ),
    (
        "gallery",
        &[
            ("image", ".tb-gallery-item img", S_NH),
            ("caption", ".tb-gallery-caption", S_N),
            ("overlay", ".tb-gallery-overlay", S_NH),
            ("grid", ".tb-gallery-grid", S_NH),
        ],
    ),
    (
        "list",
        &[
            ("item", "li", S_NH),
            ("bullet", "li::marker", S_NH),
            ("icon", ".tb-list-icon", S_N),
        ],
    ),
    (
        "quote",
        &[
            ("quote", "blockquote, .tb-quote-text", S_NH),
            ("author", ".tb-quote-author", S_N),
            ("icon", ".tb-quote-icon", S_NH),
            ("border", ".tb-quote-border", S_NH),
        ],
    ),
    (
        "hero",
        &[
            ("container", ".tb-hero-container", S_N),
            ("overlay", ".tb-hero-overlay", S_N),
            ("content", ".tb-hero-content", S_N),
            ("title", ".tb-hero-title", S_NH),
            ("subtitle", ".tb-hero-subtitle", S_NH),
            ("description", ".tb-hero-description", S_N),
            ("button", ".tb-hero-button, .tb-hero-btn", S_NHA),
            ("button_secondary", ".tb-hero-button-secondary", S_NHA),
        ],
    ),
    (
        "cta",
        &[
            ("title", ".tb-cta-title", S_N),
            ("subtitle", ".tb-cta-subtitle", S_NH),
            ("button", ".tb-cta-button", S_NHA),
        ],
    ),
    (
        "blurb",
        &[
            ("icon", ".tb-blurb-icon", S_NH),
            ("title", ".tb-blurb-title", S_NH),
            ("text", ".tb-blurb-text", S_NH),
        ],
    ),
    (
        "testimonial",
        &[
            ("quote", ".tb-testimonial-quote", S_N),
            ("author", ".tb-testimonial-author", S_NH),
            ("role", ".tb-testimonial-role", S_N),
            ("image", ".tb-testimonial-image", S_NH),
            ("icon", ".tb-testimonial-icon", S_NH),
        ],
    ),
    (
        "team",
        &[
            ("image", ".tb-team-image", S_NH),
            ("name", ".tb-team-name", S_NH),
            ("role", ".tb-team-role", S_N),
            ("bio", ".tb-team-bio", S_N),
            ("social", ".tb-team-social a", S_N),
        ],
    ),
    (
        "pricing",
        &[
            ("header", ".tb-pricing-header", S_N),
            ("title", ".tb-pricing-title", S_N),
            ("price", ".tb-pricing-price", S_N),
            ("period", ".tb-pricing-period", S_N),
            ("features", ".tb-pricing-features li", S_N),
            ("feature_icon", ".tb-pricing-feature-icon", S_NH),
            ("button", ".tb-pricing-button", S_NHA),
            ("badge", ".tb-pricing-badge", S_N),
        ],
    ),
    (
        "form",
        &[
            ("label", "label", S_N),
            ("input", "input, select", S_NHF),
            ("textarea", "textarea", S_NHF),
            (
                "submit",
                "button[type=\"submit\"], input[type=\"submit\"]",
                S_NHA,
            ),
            ("error", ".tb-form-error", S_N),
            ("success", ".tb-form-success", S_N),
        ],
    ),
    (
        "social",
        &[
            ("icon", ".tb-social-icon", S_NH),
            ("container", ".tb-social-container", S_N),
        ],
    ),
    (
        "slider",
        &[
            ("slide", ".tb-slide", S_NA),
            ("title", ".tb-slide-title", S_N),
            ("text", ".tb-slide-text", S_NH),
            ("button", ".tb-slide-button", S_NH),
            ("nav", ".tb-slider-nav", S_NH),
            ("dots", ".tb-slider-dots span", S_NHA),
        ],
    ),
    (
        "menu",
        &[
            ("item", ".tb-menu-item", S_NHA),
            ("submenu", ".tb-submenu", S_N),
            ("submenu_item", ".tb-submenu-item", S_NH),
            ("icon", ".tb-menu-icon", S_NH),
        ],
    ),
    (
        "blog",
        &[
            ("card", ".tb-post-card", S_NH),
            ("image", ".tb-post-image", S_NH),
            ("title", ".tb-post-title", S_NH),
            ("meta", ".tb-post-meta", S_N),
            ("excerpt", ".tb-post-excerpt", S_N),
            ("button", ".tb-post-button", S_NH),
            ("category", ".tb-post-category", S_NH),
        ],
    ),
    (
        "table",
        &[
            ("table", "table", S_NH),
            ("header", "thead tr, th", S_NH),
            ("row", "tbody tr", S_NH),
            ("cell", "td", S_NH),
            ("stripe", "tbody tr:nth-child(even)", S_NH),
        ],
    ),
    (
        "code",
        &[
            ("container", ".tb-code-container", S_N),
            ("code", "code, pre", S_NH),
            ("header", ".tb-code-header", S_NH),
            ("copy_button", ".tb-code-copy", S_NH),
            ("line_numbers", ".tb-line-numbers", S_N),
        ],
    ),
    (
        "alert",
        &[
            ("container", ".tb-alert", S_N),
            ("icon", ".tb-alert-icon", S_N),
            ("title", ".tb-alert-title", S_N),
            ("text", ".tb-alert-text", S_NH),
            ("close", ".tb-alert-close", S_NH),
        ],
    ),
];

/// Element schemas indexed by module type.
///
/// [`SchemaRegistry::default`] holds the built-in module types; callers may
/// register more or override built-ins, either in code or from JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ModuleSchema>,
}

impl SchemaRegistry {
    /// Create a registry with no schemas.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Create a registry with the built-in module types.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (module_type, elements) in BUILTIN {
            let schema = elements.iter().fold(
                ModuleSchema::new(*module_type),
                |schema, (key, selector, states)| {
                    schema.with_element(
                        ElementSpec::new(*key, *selector).with_states(states.iter().copied()),
                    )
                },
            );
            registry.register(schema);
        }
        registry
    }

    /// Add or replace the schema for its module type, returning the previous
    /// one.
    pub fn register(&mut self, schema: ModuleSchema) -> Option<ModuleSchema> {
        self.schemas.insert(schema.module_type.clone(), schema)
    }

    /// Schema of a module type.
    #[must_use]
    pub fn get(&self, module_type: &str) -> Option<&ModuleSchema> {
        self.schemas.get(module_type)
    }

    /// Registered module types, sorted.
    #[must_use]
    pub fn module_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of registered module types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schemas are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Register every schema in a JSON array of [`ModuleSchema`] objects.
    ///
    /// Returns how many schemas were registered.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Serialization`] if the JSON does not describe a
    /// list of schemas.
    pub fn extend_from_json(&mut self, json: &str) -> StyleResult<usize> {
        let schemas: Vec<ModuleSchema> = serde_json::from_str(json)?;
        let count = schemas.len();
        for schema in schemas {
            tracing::debug!(module_type = %schema.module_type, "registering element schema");
            self.register(schema);
        }
        Ok(count)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
