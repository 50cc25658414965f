//! JavaScript sources injected into pages.
//!
//! Element lookup and waiting run inside the page so a single
//! `Runtime.evaluate` round trip covers an entire wait. Element actions are
//! function declarations invoked through `Runtime.callFunctionOn` with
//! `this` bound to the element.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use super::selector::{By, WaitState};

// ============================================================================
// Lookup
// ============================================================================

/// Resolves to the first element matching the locator in the requested
/// state, or `null` once `timeoutMs` has elapsed.
///
/// Arguments: `(strategy, value, text, state, timeoutMs)`.
const WAIT_FOR_ELEMENT: &str = r#"(strategy, value, text, state, timeoutMs) => new Promise((resolve) => {
  const norm = (s) => (s || "").replace(/\s+/g, " ").trim();
  const byTextNode = (pred) => {
    const walker = document.createTreeWalker(document.body || document.documentElement, NodeFilter.SHOW_TEXT);
    for (let node = walker.nextNode(); node; node = walker.nextNode()) {
      if (pred(norm(node.textContent)) && node.parentElement) return node.parentElement;
    }
    return null;
  };
  const locate = () => {
    switch (strategy) {
      case "css": return document.querySelector(value);
      case "xpath": return document.evaluate(value, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;
      case "id": return document.getElementById(value);
      case "text": return byTextNode((t) => t === norm(value));
      case "partialText": return byTextNode((t) => t.includes(value));
      case "hasText": {
        const needle = (text || "").toLowerCase();
        return Array.from(document.querySelectorAll(value))
          .find((el) => norm(el.innerText || el.textContent).toLowerCase().includes(needle)) || null;
      }
      default: throw new Error("unknown locator strategy: " + strategy);
    }
  };
  const visible = (el) => {
    const style = window.getComputedStyle(el);
    if (style.visibility === "hidden" || style.display === "none") return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
  };
  const check = () => {
    const el = locate();
    if (!el) return null;
    return state === "visible" && !visible(el) ? null : el;
  };
  const found = check();
  if (found || timeoutMs <= 0) { resolve(found); return; }
  let observer, poll, timer;
  const done = (el) => {
    observer.disconnect(); clearInterval(poll); clearTimeout(timer);
    resolve(el);
  };
  const recheck = () => { const el = check(); if (el) done(el); };
  observer = new MutationObserver(recheck);
  observer.observe(document.documentElement, { childList: true, subtree: true, attributes: true, characterData: true });
  poll = setInterval(recheck, 100);
  timer = setTimeout(() => done(check()), timeoutMs);
})"#;

/// Returns `document.body.innerText` (empty when there is no body).
pub const BODY_TEXT: &str = "document.body ? document.body.innerText : ''";

// ============================================================================
// Element Functions
// ============================================================================

/// Replaces the element's content with `arguments[0]` and fires the events
/// editors listen for.
///
/// Handles form controls and `contenteditable` hosts alike.
pub const FILL: &str = r#"function (value) {
  this.focus();
  if (this.isContentEditable) {
    const selection = window.getSelection();
    const range = document.createRange();
    range.selectNodeContents(this);
    selection.removeAllRanges();
    selection.addRange(range);
    if (!document.execCommand("insertText", false, value)) {
      this.textContent = value;
    }
  } else {
    const proto = this instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
    const setter = Object.getOwnPropertyDescriptor(proto, "value");
    if (setter && setter.set) setter.set.call(this, value); else this.value = value;
  }
  this.dispatchEvent(new InputEvent("input", { bubbles: true, data: value, inputType: "insertText" }));
  this.dispatchEvent(new Event("change", { bubbles: true }));
}"#;

/// Scrolls the element into view and clicks it.
pub const CLICK: &str = r#"function () {
  this.scrollIntoView({ block: "center", inline: "center" });
  this.click();
}"#;

/// Returns the element's rendered text.
pub const INNER_TEXT: &str = r#"function () {
  return this.innerText ?? this.textContent ?? "";
}"#;

// ============================================================================
// Builders
// ============================================================================

/// Builds the expression that waits for `by` to reach `state`.
#[must_use]
pub fn wait_for_element(by: &By, state: WaitState, timeout_ms: u64) -> String {
    let args = [
        Value::from(by.strategy()),
        Value::from(by.value()),
        by.text_filter().map_or(Value::Null, Value::from),
        Value::from(state.as_str()),
        Value::from(timeout_ms),
    ];

    let args = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!("({WAIT_FOR_ELEMENT})({args})")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_expression_embeds_arguments() {
        let expr = wait_for_element(
            &By::css("textarea[placeholder*=\"Message\"]"),
            WaitState::Visible,
            5000,
        );

        assert!(expr.starts_with("((strategy, value, text, state, timeoutMs)"));
        assert!(expr.ends_with(r#"("css", "textarea[placeholder*=\"Message\"]", null, "visible", 5000)"#));
    }

    #[test]
    fn test_wait_expression_has_text() {
        let expr = wait_for_element(&By::has_text("button", "Send"), WaitState::Attached, 0);
        assert!(expr.ends_with(r#"("hasText", "button", "Send", "attached", 0)"#));
    }

    #[test]
    fn test_wait_expression_escapes_unicode_safely() {
        let expr = wait_for_element(&By::text("추천"), WaitState::Visible, 10);
        assert!(expr.contains("\"추천\""));
    }

    #[test]
    fn test_wait_observes_mutations_with_interval_recheck() {
        let expr = wait_for_element(&By::css("div.reply"), WaitState::Visible, 1000);
        assert!(expr.contains("new MutationObserver(recheck)"));
        assert!(expr.contains("setInterval(recheck, 100)"));
        assert!(expr.contains("observer.disconnect(); clearInterval(poll); clearTimeout(timer);"));
    }

    #[test]
    fn test_element_functions_are_declarations() {
        for source in [FILL, CLICK, INNER_TEXT] {
            assert!(source.starts_with("function ("));
        }
    }
}
