//! Line scanner for wasm-bindgen output.
//!
//! The generator's emitted module has a narrow, stable shape, so a full
//! JavaScript parse is unnecessary: one anchored recognizer per construct
//! (wasm import, exported function, exported constant, exported class) is
//! enough. Anything no recognizer claims passes through verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::diagnostic::TransformMismatch;

/// How a recorded binding is backed in the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Function or constant assigned into the binding container directly
    Value,
    /// Class whose container property aliases the class itself
    Class,
}

/// One exported symbol discovered during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
}

impl Binding {
    fn value(name: &str) -> Self {
        Binding {
            name: name.to_string(),
            kind: BindingKind::Value,
        }
    }

    fn class(name: &str) -> Self {
        Binding {
            name: name.to_string(),
            kind: BindingKind::Class,
        }
    }
}

/// Result of one scan pass: the recorded bindings, in document order, plus
/// the residual rewritten text.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub bindings: Vec<Binding>,
    pub rewritten: String,
}

static WASM_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^import \* as wasm from ['"][^'"]+['"];?\s*$"#).unwrap());
static EXPORT_FN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export function (\w+)").unwrap());
static EXPORT_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export const (\w+)").unwrap());
static EXPORT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^export class (\w+)").unwrap());

/// Scan generator output, rewriting exports to populate the binding
/// container instead of the module's export list.
///
/// The wasm import statement is the structural anchor of the expected
/// shape; output without one is from an unsupported generator version and
/// fails hard rather than degrading to an empty binding set. An output
/// with the anchor but no exports is valid: a crate with no JS-facing
/// surface.
pub fn scan(source: &str) -> Result<ScanOutput, TransformMismatch> {
    let mut bindings = Vec::new();
    let mut rewritten = String::with_capacity(source.len());
    let mut import_found = false;

    for line in source.lines() {
        if WASM_IMPORT.is_match(line) {
            import_found = true;
            // Binding container plus the "instance not yet ready" slot the
            // loader fills in after instantiation.
            rewritten.push_str("let wasm;\nconst __exports = {};");
        } else if let Some(cap) = EXPORT_FN.captures(line) {
            let name = &cap[1];
            bindings.push(Binding::value(name));
            let rest = &line[cap.get(0).unwrap().end()..];
            rewritten.push_str(&format!("__exports.{name} = function{rest}"));
        } else if let Some(cap) = EXPORT_CONST.captures(line) {
            let name = &cap[1];
            bindings.push(Binding::value(name));
            let rest = &line[cap.get(0).unwrap().end()..];
            rewritten.push_str(&format!("__exports.{name}{rest}"));
        } else if let Some(cap) = EXPORT_CLASS.captures(line) {
            let name = &cap[1];
            bindings.push(Binding::class(name));
            let rest = &line[cap.get(0).unwrap().end()..];
            rewritten.push_str(&format!("class {name}{rest}"));
        } else {
            rewritten.push_str(line);
        }
        rewritten.push('\n');
    }

    if !import_found {
        return Err(TransformMismatch);
    }

    Ok(ScanOutput {
        bindings,
        rewritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "import * as wasm from './my_crate_bg.wasm';\n";

    #[test]
    fn test_import_becomes_container_and_slot() {
        let out = scan(HEADER).unwrap();
        assert!(out.rewritten.contains("let wasm;"));
        assert!(out.rewritten.contains("const __exports = {};"));
        assert!(!out.rewritten.contains("import * as wasm"));
    }

    #[test]
    fn test_function_export_rewritten() {
        let src = format!("{HEADER}export function add(a, b) {{\n    return wasm.add(a, b);\n}}\n");
        let out = scan(&src).unwrap();

        assert_eq!(out.bindings, vec![Binding::value("add")]);
        assert!(out.rewritten.contains("__exports.add = function(a, b) {"));
        assert!(out.rewritten.contains("return wasm.add(a, b);"));
    }

    #[test]
    fn test_const_export_body_kept() {
        let src = format!("{HEADER}export const Direction = Object.freeze({{ Up: 0, Down: 1 }});\n");
        let out = scan(&src).unwrap();

        assert_eq!(out.bindings, vec![Binding::value("Direction")]);
        assert!(out
            .rewritten
            .contains("__exports.Direction = Object.freeze({ Up: 0, Down: 1 });"));
    }

    #[test]
    fn test_class_export_stripped_and_recorded() {
        let src = format!("{HEADER}export class Counter {{\n    free() {{}}\n}}\n");
        let out = scan(&src).unwrap();

        assert_eq!(out.bindings, vec![Binding::class("Counter")]);
        assert!(out.rewritten.contains("class Counter {"));
        assert!(!out.rewritten.contains("export class"));
    }

    #[test]
    fn test_unrecognized_lines_pass_through() {
        let src = format!("{HEADER}let cachedTextDecoder = new TextDecoder('utf-8');\n");
        let out = scan(&src).unwrap();

        assert!(out
            .rewritten
            .contains("let cachedTextDecoder = new TextDecoder('utf-8');"));
    }

    #[test]
    fn test_missing_import_anchor_is_mismatch() {
        assert!(scan("export function add(a, b) {}\n").is_err());
    }

    #[test]
    fn test_zero_exports_is_valid() {
        let out = scan(HEADER).unwrap();
        assert!(out.bindings.is_empty());
    }

    #[test]
    fn test_bindings_in_document_order() {
        let src = format!(
            "{HEADER}export function beta() {{}}\nexport class Alpha {{}}\nexport function gamma() {{}}\n"
        );
        let names: Vec<_> = scan(&src)
            .unwrap()
            .bindings
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["beta", "Alpha", "gamma"]);
    }
}
