//! `${name}` placeholder expansion.
//!
//! Values may themselves contain placeholders; they are expanded
//! recursively.  A chain that comes back to a symbol already being expanded
//! is rejected instead of looping forever.

use crate::application::settings::SymbolProvider;
use crate::error::SettingsError;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Replaces every `${name}` in `template` with the provider's value for `name`.
///
/// An opening `${` with no closing `}` is copied through unchanged.
///
/// # Errors
///
/// - [`SettingsError::UnresolvedSymbol`] if a name has no value.
/// - [`SettingsError::RecursiveSymbol`] if expansion would loop.
///
/// # Examples
///
/// ```rust
/// use installer_settings::expand_symbols;
/// use settings_core::PropertyMap;
///
/// let mut symbols = PropertyMap::new();
/// symbols.insert("app.home".to_string(), "/opt/app".to_string());
/// symbols.insert("app.logs".to_string(), "${app.home}/logs".to_string());
///
/// let expanded = expand_symbols("logs in ${app.logs}", &symbols).unwrap();
/// assert_eq!(expanded, "logs in /opt/app/logs");
/// ```
pub fn expand_symbols(
    template: &str,
    provider: &dyn SymbolProvider,
) -> Result<String, SettingsError> {
    let mut stack = Vec::new();
    expand(template, provider, &mut stack)
}

fn expand(
    template: &str,
    provider: &dyn SymbolProvider,
    stack: &mut Vec<String>,
) -> Result<String, SettingsError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = &after[..end];
        out.push_str(&resolve(name, provider, stack)?);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn resolve(
    name: &str,
    provider: &dyn SymbolProvider,
    stack: &mut Vec<String>,
) -> Result<String, SettingsError> {
    if stack.iter().any(|seen| seen == name) {
        let mut chain = stack.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(name);
        return Err(SettingsError::RecursiveSymbol {
            name: name.to_string(),
            chain,
        });
    }

    let raw = provider
        .value_for_symbol(name)
        .ok_or_else(|| SettingsError::UnresolvedSymbol {
            name: name.to_string(),
        })?;

    stack.push(name.to_string());
    let expanded = expand(&raw, provider, stack)?;
    stack.pop();
    Ok(expanded)
}
