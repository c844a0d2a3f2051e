// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "pt";

// Catálogos embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

// Mensagens traduzidas por idioma: lang -> (chave -> texto)
#[derive(Debug, Default)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in CATALOGS {
            let catalog: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de idioma '{}' inválido", lang))?;
            messages.insert(lang.to_string(), catalog);
        }
        tracing::info!("🌐 {} idiomas carregados", messages.len());
        Ok(Self { messages })
    }

    /// Procura a chave no idioma pedido, depois no padrão (pt).
    /// Sem tradução, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        [lang, DEFAULT_LANG]
            .iter()
            .filter_map(|l| self.messages.get(*l))
            .find_map(|catalog| catalog.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let pt = &store.messages["pt"];
        let en = &store.messages["en"];
        for key in pt.keys() {
            assert!(en.contains_key(key), "chave '{}' faltando em en", key);
        }
        assert_eq!(pt.len(), en.len());
    }

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("fr", "shift_not_found"), "Plantão não encontrado.");
        assert_eq!(store.translate("en", "shift_not_found"), "Shift not found.");
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "nao_existe"), "nao_existe");
    }
}
