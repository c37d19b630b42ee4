// SPDX-License-Identifier: MPL-2.0
//! Language-selector control injected into the page.
//!
//! The `select` carries an `onchange` handler (configurable, default
//! `i18n.setLanguage(this.value)`) so a browser loading the output page can
//! switch languages through the page's own script.

use crate::config::DocumentConfig;
use crate::i18n::Locale;
use crate::port::{DocumentView, ElementSpec, NodeId};

/// Builds the selector wrapper: a right-aligned container holding a
/// `select` with one option per supported locale.
pub fn selector_spec(contract: &DocumentConfig) -> ElementSpec {
    let mut select = ElementSpec::new("select")
        .attr("id", contract.selector_id())
        .attr("name", "lang")
        .attr("style", "padding:5px; border-radius:5px;");
    if let Some(script) = contract.selector_onchange() {
        select = select.attr("onchange", script);
    }

    let select = Locale::ALL.into_iter().fold(select, |select, locale| {
        select.child(
            ElementSpec::new("option")
                .attr("value", locale.code())
                .text(locale.native_name()),
        )
    });

    ElementSpec::new("div")
        .attr("id", contract.selector_container_id())
        .attr("style", "text-align: right; margin-bottom: 15px;")
        .child(select)
}

/// Injects the selector into the mount container and selects `current`.
///
/// Returns the selector's handle, or `None` when there is no mount
/// container or the selector wrapper is already present.
pub fn render(
    document: &mut dyn DocumentView,
    contract: &DocumentConfig,
    current: Locale,
) -> Option<NodeId> {
    let mount = document.first_by_class(contract.mount_class())?;
    if document
        .element_by_id(contract.selector_container_id())
        .is_some()
    {
        return None;
    }

    document.prepend_child(mount, &selector_spec(contract))?;
    let selector = document.element_by_id(contract.selector_id())?;
    document.set_control_value(selector, current.code());
    tracing::debug!("rendered language selector for {}", current);
    Some(selector)
}
