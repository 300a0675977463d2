use crate::error::LoadError;
use crate::load::LoadedDefinition;
use bundlecheck_types::definition::DefinitionCatalog;
use camino::Utf8PathBuf;
use std::collections::BTreeMap;

/// Builds the definition catalog from the loaded definitions.
///
/// Definitions that failed to load are left out. Two files declaring the same name abort
/// catalog construction: every reference to that name would be ambiguous.
pub fn build_catalog(definitions: &[LoadedDefinition]) -> Result<DefinitionCatalog, LoadError> {
    let mut seen: BTreeMap<&str, &Utf8PathBuf> = BTreeMap::new();

    for loaded in definitions {
        let Ok(def) = &loaded.definition else {
            continue;
        };
        if let Some(first) = seen.insert(def.name.as_str(), &loaded.path) {
            return Err(LoadError::DuplicateDefinition {
                name: def.name.clone(),
                first: first.clone(),
                second: loaded.path.clone(),
            });
        }
    }

    Ok(DefinitionCatalog::from_unique(
        definitions
            .iter()
            .filter_map(|d| d.definition.as_ref().ok().cloned()),
    ))
}
