//! Per-pattern minimum levels.
//!
//! A `LoggerConfig` maps pattern strings to minimum levels and resolves the
//! effective level of a tag by picking the most specific matching pattern,
//! i.e. the longest pattern string. Tags matched by no rule use the default
//! level.
//!
//! Rules can also be loaded from a directive string:
//!
//! ```
//! use tracing_tags::{Level, LoggerConfig};
//!
//! let config = LoggerConfig::builder()
//!     .with_directives("warn,EduGo.Auth.*=info")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_level(), Level::Warning);
//! assert!(config.is_enabled("EduGo.Auth.Login", Level::Info));
//! assert!(!config.is_enabled("EduGo.Network.HTTP", Level::Info));
//! ```

use crate::application::filter::LogFilter;
use crate::domain::level::{Level, LevelParseError};
use crate::infrastructure::pattern_cache::CompiledPattern;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Error returned for invalid level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A rule pattern is empty or whitespace only
    BlankPattern,
    /// A directive is not `level` or `pattern=level`
    InvalidDirective {
        /// The offending directive
        directive: String,
    },
    /// A level name was not recognized
    UnknownLevel(LevelParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BlankPattern => write!(f, "rule pattern must not be blank"),
            ConfigError::InvalidDirective { directive } => {
                write!(f, "invalid directive '{}'", directive)
            }
            ConfigError::UnknownLevel(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::UnknownLevel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LevelParseError> for ConfigError {
    fn from(e: LevelParseError) -> Self {
        ConfigError::UnknownLevel(e)
    }
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Rule pattern, or `None` for the default level
    pub pattern: Option<String>,
    pub level: Level,
}

/// Parse a comma-separated directive list such as `"warn,EduGo.Auth.*=info"`.
///
/// A bare level sets the default; `pattern=level` adds a rule. Empty items
/// are skipped.
pub fn parse_directives(input: &str) -> Result<Vec<Directive>, ConfigError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.rsplit_once('=') {
            Some((pattern, level)) => {
                let pattern = pattern.trim();
                if pattern.is_empty() {
                    return Err(ConfigError::BlankPattern);
                }
                if level.trim().is_empty() {
                    return Err(ConfigError::InvalidDirective {
                        directive: item.to_string(),
                    });
                }
                Ok(Directive {
                    pattern: Some(pattern.to_string()),
                    level: level.parse()?,
                })
            }
            None => Ok(Directive {
                pattern: None,
                level: item.parse()?,
            }),
        })
        .collect()
}

/// Serializable view of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigSnapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_level: Level,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: BTreeMap<String, Level>,
}

/// A rule level together with its pattern, compiled when the rule is set.
#[derive(Debug, Clone)]
struct Rule {
    level: Level,
    compiled: Arc<CompiledPattern>,
}

impl Rule {
    fn matches(&self, tag: &str) -> bool {
        match self.compiled.as_ref() {
            Ok(pattern) => pattern.matches(tag),
            Err(_) => false,
        }
    }
}

type RuleTable = BTreeMap<String, Rule>;

#[derive(Debug)]
struct ConfigState {
    rules: Arc<RuleTable>,
    default_level: Level,
}

fn levels_of(rules: &RuleTable) -> BTreeMap<String, Level> {
    rules
        .iter()
        .map(|(pattern, rule)| (pattern.clone(), rule.level))
        .collect()
}

/// Builder for constructing a `LoggerConfig`.
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    default_level: Level,
    rules: Vec<(String, Level)>,
    directives: Vec<String>,
    filter: Option<Arc<LogFilter>>,
}

impl LoggerConfigBuilder {
    /// Level used when no rule matches. Also the level `reset()` restores.
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Add a rule. Validated when `build()` is called.
    pub fn with_level(mut self, pattern: impl Into<String>, level: Level) -> Self {
        self.rules.push((pattern.into(), level));
        self
    }

    /// Add rules from a directive string, applied after `with_level` rules.
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives.push(directives.into());
        self
    }

    /// Share a `LogFilter` (and its pattern cache) with other components.
    pub fn with_filter(mut self, filter: Arc<LogFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Build the config.
    ///
    /// # Errors
    /// Returns `ConfigError` if a pattern is blank or a directive is malformed.
    pub fn build(self) -> Result<LoggerConfig, ConfigError> {
        let mut default_level = self.default_level;
        let mut levels = BTreeMap::new();

        for (pattern, level) in self.rules {
            if pattern.trim().is_empty() {
                return Err(ConfigError::BlankPattern);
            }
            levels.insert(pattern, level);
        }
        for input in &self.directives {
            for directive in parse_directives(input)? {
                match directive.pattern {
                    Some(pattern) => {
                        levels.insert(pattern, directive.level);
                    }
                    None => default_level = directive.level,
                }
            }
        }

        let filter = self.filter.unwrap_or_default();
        let rules = compile_rules(&filter, levels);

        Ok(LoggerConfig {
            state: RwLock::new(ConfigState {
                rules: Arc::new(rules),
                default_level,
            }),
            initial_default: default_level,
            filter,
        })
    }
}

fn compile_rules(filter: &LogFilter, levels: BTreeMap<String, Level>) -> RuleTable {
    levels
        .into_iter()
        .map(|(pattern, level)| {
            let compiled = filter.compile(&pattern);
            (pattern, Rule { level, compiled })
        })
        .collect()
}

/// Pattern → minimum level rules with a default level.
///
/// One lock guards both the rule table and the default level. The table is
/// copy-on-write: `level_for` snapshots it under the lock and matches after
/// releasing it, so writers never wait on pattern matching.
///
/// Each rule keeps the pattern compiled when the rule was set, so resolving
/// a level never goes through the filter's bounded cache.
#[derive(Debug)]
pub struct LoggerConfig {
    state: RwLock<ConfigState>,
    initial_default: Level,
    filter: Arc<LogFilter>,
}

impl LoggerConfig {
    /// Create an empty config with default level `Debug` and its own filter.
    pub fn new() -> Self {
        Self::with_filter(Arc::new(LogFilter::new()))
    }

    /// Create an empty config matching through a shared filter.
    pub fn with_filter(filter: Arc<LogFilter>) -> Self {
        Self {
            state: RwLock::new(ConfigState {
                rules: Arc::new(BTreeMap::new()),
                default_level: Level::default(),
            }),
            initial_default: Level::default(),
            filter,
        }
    }

    /// Create a builder for configuring the rules.
    pub fn builder() -> LoggerConfigBuilder {
        LoggerConfigBuilder::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The filter used to match tags against rule patterns.
    pub fn filter(&self) -> &Arc<LogFilter> {
        &self.filter
    }

    /// Level used for tags no rule matches.
    pub fn default_level(&self) -> Level {
        self.read().default_level
    }

    /// Replaces the default level. Rules are kept.
    pub fn set_default_level(&self, level: Level) {
        self.write().default_level = level;
        tracing::debug!(%level, "default level changed");
    }

    /// Insert or replace the rule for `pattern`.
    ///
    /// # Errors
    /// Returns `ConfigError::BlankPattern` for an empty or whitespace pattern.
    pub fn set_level(&self, pattern: impl Into<String>, level: Level) -> Result<(), ConfigError> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(ConfigError::BlankPattern);
        }
        let compiled = self.filter.compile(&pattern);
        {
            let mut state = self.write();
            Arc::make_mut(&mut state.rules).insert(pattern.clone(), Rule { level, compiled });
        }
        tracing::debug!(%pattern, %level, "level rule set");
        Ok(())
    }

    /// Remove the rule for `pattern`, returning its level if there was one.
    pub fn remove_level(&self, pattern: &str) -> Option<Level> {
        let mut state = self.write();
        if !state.rules.contains_key(pattern) {
            return None;
        }
        Arc::make_mut(&mut state.rules)
            .remove(pattern)
            .map(|rule| rule.level)
    }

    /// Remove every rule. The default level is kept.
    pub fn clear_levels(&self) {
        self.write().rules = Arc::new(BTreeMap::new());
    }

    /// Apply a directive string atomically.
    ///
    /// Either every directive is applied or, on a parse error, none is.
    pub fn apply_directives(&self, input: &str) -> Result<(), ConfigError> {
        let directives = parse_directives(input)?;
        let compiled: Vec<_> = directives
            .iter()
            .map(|directive| {
                let rule = directive.pattern.as_ref().map(|pattern| {
                    let compiled = self.filter.compile(pattern);
                    (pattern.clone(), compiled)
                });
                (rule, directive.level)
            })
            .collect();
        {
            let mut state = self.write();
            for (rule, level) in compiled {
                match rule {
                    Some((pattern, compiled)) => {
                        Arc::make_mut(&mut state.rules).insert(pattern, Rule { level, compiled });
                    }
                    None => state.default_level = level,
                }
            }
        }
        tracing::debug!(count = directives.len(), "directives applied");
        Ok(())
    }

    /// Effective minimum level for `tag`.
    ///
    /// Among the rules whose pattern matches, the longest pattern string wins.
    /// Patterns of equal length are ranked lexicographically, smallest first.
    pub fn level_for(&self, tag: &str) -> Level {
        let (rules, default_level) = {
            let state = self.read();
            (Arc::clone(&state.rules), state.default_level)
        };
        if tag.trim().is_empty() {
            return default_level;
        }

        rules
            .iter()
            .filter(|(_, rule)| rule.matches(tag))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(_, rule)| rule.level)
            .unwrap_or(default_level)
    }

    /// Whether a message at `level` for `tag` passes.
    pub fn is_enabled(&self, tag: &str, level: Level) -> bool {
        level >= self.level_for(tag)
    }

    /// Copy of the rule table.
    pub fn rules(&self) -> BTreeMap<String, Level> {
        levels_of(&self.read().rules)
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.read().rules.len()
    }

    /// Clear all rules and restore the initial default level.
    pub fn reset(&self) {
        let mut state = self.write();
        state.rules = Arc::new(BTreeMap::new());
        state.default_level = self.initial_default;
    }

    /// Capture the current default level and rules.
    pub fn snapshot(&self) -> ConfigSnapshot {
        let state = self.read();
        ConfigSnapshot {
            default_level: state.default_level,
            rules: levels_of(&state.rules),
        }
    }

    /// Replace the current state with `snapshot`.
    ///
    /// # Errors
    /// Returns `ConfigError::BlankPattern` if any rule pattern is blank; the
    /// current state is left untouched in that case.
    pub fn restore(&self, snapshot: ConfigSnapshot) -> Result<(), ConfigError> {
        if snapshot.rules.keys().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::BlankPattern);
        }
        let rules = compile_rules(&self.filter, snapshot.rules);
        let mut state = self.write();
        state.rules = Arc::new(rules);
        state.default_level = snapshot.default_level;
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::new();
        assert_eq!(config.default_level(), Level::Debug);
        assert_eq!(config.level_for("EduGo.Auth"), Level::Debug);
        assert!(config.is_enabled("EduGo.Auth", Level::Debug));
        assert!(config.rules().is_empty());
    }

    #[test]
    fn test_auth_scenario() {
        let config = LoggerConfig::new();
        config.set_level("EduGo.Auth.*", Level::Info).unwrap();

        assert!(!config.is_enabled("EduGo.Auth.Login", Level::Debug));
        assert!(config.is_enabled("EduGo.Auth.Login", Level::Info));
        assert!(config.is_enabled("EduGo.Network.HTTP", Level::Debug));
    }

    #[test]
    fn test_most_specific_wins() {
        let config = LoggerConfig::new();
        config.set_level("EduGo.**", Level::Error).unwrap();
        config.set_level("EduGo.Auth.**", Level::Warning).unwrap();
        config.set_level("EduGo.Auth.Login", Level::Debug).unwrap();

        assert_eq!(config.level_for("EduGo.Auth.Login"), Level::Debug);
        assert_eq!(config.level_for("EduGo.Auth.Logout"), Level::Warning);
        assert_eq!(config.level_for("EduGo.Network"), Level::Error);
        assert_eq!(config.level_for("Other"), Level::Debug);
    }

    #[test]
    fn test_equal_length_tie_break() {
        let config = LoggerConfig::new();
        config.set_level("A.*.C", Level::Error).unwrap();
        config.set_level("A.B.*", Level::Info).unwrap();

        // "A.*.C" sorts before "A.B.*"
        assert_eq!(config.level_for("A.B.C"), Level::Error);
    }

    #[test]
    fn test_blank_pattern_rejected() {
        let config = LoggerConfig::new();
        assert_eq!(
            config.set_level("  ", Level::Info),
            Err(ConfigError::BlankPattern)
        );
        assert_eq!(config.rule_count(), 0);
    }

    #[test]
    fn test_upsert_and_remove() {
        let config = LoggerConfig::new();
        config.set_level("EduGo.*", Level::Info).unwrap();
        config.set_level("EduGo.*", Level::Error).unwrap();
        assert_eq!(config.rule_count(), 1);
        assert_eq!(config.level_for("EduGo.Auth"), Level::Error);

        assert_eq!(config.remove_level("EduGo.*"), Some(Level::Error));
        assert_eq!(config.remove_level("EduGo.*"), None);
        assert_eq!(config.level_for("EduGo.Auth"), Level::Debug);
    }

    #[test]
    fn test_invalid_pattern_rule_never_applies() {
        let config = LoggerConfig::new();
        config.set_level("regex:(", Level::Error).unwrap();
        assert_eq!(config.level_for("EduGo"), Level::Debug);
    }

    #[test]
    fn test_clear_levels_keeps_default() {
        let config = LoggerConfig::new();
        config.set_default_level(Level::Warning);
        config.set_level("EduGo.*", Level::Info).unwrap();

        config.clear_levels();
        assert!(config.rules().is_empty());
        assert_eq!(config.default_level(), Level::Warning);
    }

    #[test]
    fn test_reset() {
        let config = LoggerConfig::new();
        config.set_default_level(Level::Error);
        config.set_level("EduGo.*", Level::Info).unwrap();

        config.reset();
        assert!(config.rules().is_empty());
        assert_eq!(config.default_level(), Level::Debug);
    }

    #[test]
    fn test_rules_is_a_copy() {
        let config = LoggerConfig::new();
        config.set_level("EduGo.*", Level::Info).unwrap();

        let mut rules = config.rules();
        rules.insert("Other.*".to_string(), Level::Error);

        assert_eq!(config.rule_count(), 1);
    }

    #[test]
    fn test_parse_directives() {
        let directives = parse_directives(" warn , EduGo.Auth.*=info,,regex:a=b=error").unwrap();
        assert_eq!(
            directives,
            vec![
                Directive {
                    pattern: None,
                    level: Level::Warning
                },
                Directive {
                    pattern: Some("EduGo.Auth.*".to_string()),
                    level: Level::Info
                },
                Directive {
                    pattern: Some("regex:a=b".to_string()),
                    level: Level::Error
                },
            ]
        );

        assert_eq!(parse_directives("=info"), Err(ConfigError::BlankPattern));
        assert!(matches!(
            parse_directives("EduGo="),
            Err(ConfigError::InvalidDirective { .. })
        ));
        assert!(matches!(
            parse_directives("EduGo=loud"),
            Err(ConfigError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_apply_directives_is_atomic() {
        let config = LoggerConfig::new();
        assert!(config.apply_directives("EduGo.*=info,Bad=nope").is_err());
        assert_eq!(config.rule_count(), 0);

        config.apply_directives("error,EduGo.*=info").unwrap();
        assert_eq!(config.default_level(), Level::Error);
        assert_eq!(config.level_for("EduGo.Auth"), Level::Info);
    }

    #[test]
    fn test_builder() {
        let config = LoggerConfig::builder()
            .with_default_level(Level::Info)
            .with_level("EduGo.Auth.*", Level::Warning)
            .with_directives("EduGo.Network.**=error")
            .build()
            .unwrap();

        assert_eq!(config.level_for("EduGo.Auth.Login"), Level::Warning);
        assert_eq!(config.level_for("EduGo.Network.HTTP.Client"), Level::Error);
        assert_eq!(config.level_for("EduGo"), Level::Info);

        config.set_default_level(Level::Error);
        config.reset();
        assert_eq!(config.default_level(), Level::Info);

        assert_eq!(
            LoggerConfig::builder()
                .with_level("", Level::Info)
                .build()
                .unwrap_err(),
            ConfigError::BlankPattern
        );
    }

    #[test]
    fn test_shared_filter() {
        let filter = Arc::new(LogFilter::new());
        let config = LoggerConfig::builder()
            .with_filter(Arc::clone(&filter))
            .with_level("EduGo.*", Level::Info)
            .build()
            .unwrap();

        config.level_for("EduGo.Auth");
        assert!(filter.is_cached("EduGo.*"));
    }

    #[test]
    fn test_snapshot_restore() {
        let config = LoggerConfig::new();
        config.set_level("EduGo.*", Level::Info).unwrap();
        let snapshot = config.snapshot();

        config.reset();
        config.restore(snapshot.clone()).unwrap();
        assert_eq!(config.snapshot(), snapshot);

        let mut bad = snapshot;
        bad.rules.insert(" ".to_string(), Level::Error);
        assert_eq!(config.restore(bad), Err(ConfigError::BlankPattern));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_deserialize() {
        let snapshot: ConfigSnapshot =
            serde_json::from_str(r#"{"default_level":"warning","rules":{"EduGo.*":"info"}}"#)
                .unwrap();
        let config = LoggerConfig::new();
        config.restore(snapshot).unwrap();
        assert_eq!(config.level_for("EduGo.Auth"), Level::Info);
        assert_eq!(config.level_for("Other"), Level::Warning);
    }

    #[test]
    fn test_concurrent_set_and_get() {
        use std::thread;

        let config = Arc::new(LoggerConfig::new());
        let mut handles = vec![];

        for i in 0..8 {
            let config = Arc::clone(&config);
            handles.push(thread::spawn(move || {
                for j in 0..50 {
                    config
                        .set_level(format!("T{}.P{}", i, j), Level::Info)
                        .unwrap();
                    let _ = config.level_for(&format!("T{}.P{}", i, j));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(config.rule_count(), 400);
        assert_eq!(config.level_for("T3.P7"), Level::Info);
    }
}
