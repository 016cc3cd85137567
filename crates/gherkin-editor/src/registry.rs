//! Process-scoped language registry.
//!
//! Editor hosts allow the same language to be registered any number of times, with undefined
//! precedence among the duplicate providers. [`LanguageRegistry`] owns the one-time side effect
//! instead: callers *request* registration and the registry decides whether any work is needed.
//!
//! Registration installs a definition's parts in a fixed order, under a single write lock:
//!
//! 1. declare the language id
//! 2. install the tokenizer
//! 3. install the theme (or keep an existing theme with the same id)
//! 4. install the language configuration (comments + indentation)
//! 5. install the completion provider

use crate::definition::{LanguageConfiguration, LanguageDefinition};
use crate::error::LanguageError;
use gherkin_editor_highlight::TokenRuleSet;
use gherkin_editor_lang::{CompletionCatalog, Theme};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Outcome of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The definition was installed by this call.
    Installed,
    /// The language id was already registered; nothing changed.
    AlreadyRegistered,
}

/// One step performed while installing a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    /// The language id was declared.
    DeclareLanguage,
    /// The tokenizer was installed.
    InstallTokenizer,
    /// The theme was installed.
    InstallTheme,
    /// The theme id was already installed by another language; the existing theme was kept.
    KeepExistingTheme,
    /// Comments and indentation rules were installed.
    InstallConfiguration,
    /// The completion provider was installed.
    InstallCompletionProvider,
}

#[derive(Debug, Default)]
struct Installed {
    languages: Vec<String>,
    definitions: HashMap<String, LanguageDefinition>,
    tokenizers: HashMap<String, Arc<TokenRuleSet>>,
    themes: HashMap<String, Arc<Theme>>,
    configurations: HashMap<String, Arc<LanguageConfiguration>>,
    completion_providers: HashMap<String, Arc<CompletionCatalog>>,
    steps: HashMap<String, Vec<RegistrationStep>>,
}

/// Registered languages and their providers.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    inner: RwLock<Installed>,
}

static GLOBAL: OnceLock<Arc<LanguageRegistry>> = OnceLock::new();

impl LanguageRegistry {
    /// Create an empty, isolated registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by every session.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Register `definition` unless its language id is already registered.
    pub fn register(&self, definition: LanguageDefinition) -> Registration {
        let mut installed = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if installed.definitions.contains_key(definition.id()) {
            debug!(language = definition.id(), "language already registered");
            return Registration::AlreadyRegistered;
        }
        install(&mut installed, definition);
        Registration::Installed
    }

    /// Register the language `id`, building its definition only if it is not registered yet.
    ///
    /// A definition built for a different id is rejected and nothing is installed.
    pub fn register_with<E: From<LanguageError>>(
        &self,
        id: &str,
        build: impl FnOnce() -> Result<LanguageDefinition, E>,
    ) -> Result<Registration, E> {
        if self.is_registered(id) {
            debug!(language = id, "language already registered");
            return Ok(Registration::AlreadyRegistered);
        }

        let definition = build()?;
        if definition.id() != id {
            warn!(
                requested = id,
                built = definition.id(),
                "definition id differs from requested id"
            );
            return Err(LanguageError::IdMismatch {
                requested: id.to_string(),
                built: definition.id().to_string(),
            }
            .into());
        }
        Ok(self.register(definition))
    }

    /// Returns `true` if `id` has been registered.
    pub fn is_registered(&self, id: &str) -> bool {
        self.read().definitions.contains_key(id)
    }

    /// Registered language ids, in registration order.
    pub fn languages(&self) -> Vec<String> {
        self.read().languages.clone()
    }

    /// The full definition registered for `id`.
    pub fn definition(&self, id: &str) -> Option<LanguageDefinition> {
        self.read().definitions.get(id).cloned()
    }

    /// The tokenizer installed for `id`.
    pub fn tokenizer(&self, id: &str) -> Option<Arc<TokenRuleSet>> {
        self.read().tokenizers.get(id).cloned()
    }

    /// The theme installed as `theme_id`.
    pub fn theme(&self, theme_id: &str) -> Option<Arc<Theme>> {
        self.read().themes.get(theme_id).cloned()
    }

    /// The language configuration installed for `id`.
    pub fn language_configuration(&self, id: &str) -> Option<Arc<LanguageConfiguration>> {
        self.read().configurations.get(id).cloned()
    }

    /// The completion provider installed for `id`.
    pub fn completion_provider(&self, id: &str) -> Option<Arc<CompletionCatalog>> {
        self.read().completion_providers.get(id).cloned()
    }

    /// The steps performed when `id` was registered, in order.
    pub fn registration_steps(&self, id: &str) -> Vec<RegistrationStep> {
        self.read().steps.get(id).cloned().unwrap_or_default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Installed> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn install(installed: &mut Installed, definition: LanguageDefinition) {
    let id = definition.id().to_string();
    let mut steps = Vec::with_capacity(5);

    installed.languages.push(id.clone());
    steps.push(RegistrationStep::DeclareLanguage);

    installed
        .tokenizers
        .insert(id.clone(), definition.tokenizer().clone());
    steps.push(RegistrationStep::InstallTokenizer);

    let theme_id = definition.theme_id().to_string();
    if installed.themes.contains_key(&theme_id) {
        warn!(language = %id, theme = %theme_id, "theme id already installed; keeping the first");
        steps.push(RegistrationStep::KeepExistingTheme);
    } else {
        installed
            .themes
            .insert(theme_id, definition.theme().clone());
        steps.push(RegistrationStep::InstallTheme);
    }

    installed
        .configurations
        .insert(id.clone(), definition.configuration().clone());
    steps.push(RegistrationStep::InstallConfiguration);

    installed
        .completion_providers
        .insert(id.clone(), definition.completions().clone());
    steps.push(RegistrationStep::InstallCompletionProvider);

    info!(language = %id, theme = definition.theme_id(), "language registered");
    installed.steps.insert(id.clone(), steps);
    installed.definitions.insert(id, definition);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::GHERKIN_LANGUAGE_ID;
    use crate::error::LanguageError;

    #[test]
    fn test_register_with_builds_once() {
        let registry = LanguageRegistry::new();
        let mut builds = 0;

        for _ in 0..3 {
            registry
                .register_with(GHERKIN_LANGUAGE_ID, || {
                    builds += 1;
                    LanguageDefinition::gherkin()
                })
                .unwrap();
        }

        assert_eq!(builds, 1);
        assert_eq!(registry.languages(), vec![GHERKIN_LANGUAGE_ID.to_string()]);
    }

    #[test]
    fn test_build_error_leaves_registry_empty() {
        let registry = LanguageRegistry::new();
        let result = registry.register_with(GHERKIN_LANGUAGE_ID, || {
            let err = regex::Regex::new("(").unwrap_err();
            Err::<LanguageDefinition, _>(LanguageError::Pattern(err))
        });

        assert!(result.is_err());
        assert!(!registry.is_registered(GHERKIN_LANGUAGE_ID));
        assert!(registry.registration_steps(GHERKIN_LANGUAGE_ID).is_empty());
    }

    #[test]
    fn test_mismatched_definition_is_rejected() {
        let registry = LanguageRegistry::new();
        let mut builds = 0;

        for _ in 0..2 {
            let result = registry.register_with("cucumber", || {
                builds += 1;
                LanguageDefinition::gherkin()
            });
            assert!(matches!(
                result,
                Err(LanguageError::IdMismatch { ref requested, ref built })
                    if requested == "cucumber" && built == GHERKIN_LANGUAGE_ID
            ));
        }

        assert_eq!(builds, 2);
        assert!(registry.languages().is_empty());
        assert!(!registry.is_registered(GHERKIN_LANGUAGE_ID));
    }

    #[test]
    fn test_shared_theme_id_is_kept_and_recorded() {
        let registry = LanguageRegistry::new();
        let gherkin = LanguageDefinition::gherkin().unwrap();
        registry.register(gherkin.clone());
        let first_theme = registry.theme(gherkin.theme_id()).unwrap();

        let cucumber = LanguageDefinition::new(
            "cucumber",
            gherkin.tokenizer().as_ref().clone(),
            gherkin.theme().as_ref().clone(),
            gherkin.configuration().as_ref().clone(),
            gherkin.completions().as_ref().clone(),
        );
        assert_eq!(registry.register(cucumber), Registration::Installed);

        assert!(Arc::ptr_eq(
            &first_theme,
            &registry.theme(gherkin.theme_id()).unwrap()
        ));
        assert_eq!(
            registry.registration_steps("cucumber"),
            vec![
                RegistrationStep::DeclareLanguage,
                RegistrationStep::InstallTokenizer,
                RegistrationStep::KeepExistingTheme,
                RegistrationStep::InstallConfiguration,
                RegistrationStep::InstallCompletionProvider,
            ]
        );
    }
}
