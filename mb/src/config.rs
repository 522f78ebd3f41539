//! Muster configuration types and loading

use chrono::NaiveTime;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub session: SessionConfig,
    pub attempt: AttemptConfig,
    pub remarks: RemarkConfig,
    pub ledger: LedgerConfig,
    /// Participant handles mapped to UTC offsets in hours
    pub roster: BTreeMap<String, f64>,
    /// Handle allowed to stop the bot remotely
    pub admin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Environment variable holding the bot token
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// Bot API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Long-poll hold time in seconds
    #[serde(rename = "poll-timeout-secs")]
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token_env: "MUSTER_BOT_TOKEN".to_string(),
            base_url: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Attending votes needed before a session counts as confirmed
    #[serde(rename = "min-participants")]
    pub min_participants: u32,

    /// Candidate start times, UTC "HH:MM"
    #[serde(rename = "slots-utc")]
    pub slots_utc: Vec<String>,

    /// How many days ahead the day picker offers
    #[serde(rename = "horizon-days")]
    pub horizon_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_participants: 2,
            slots_utc: vec![
                "16:00".to_string(),
                "16:30".to_string(),
                "17:00".to_string(),
                "17:30".to_string(),
                "18:00".to_string(),
            ],
            horizon_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttemptConfig {
    /// Floor the result slider clamps at
    #[serde(rename = "min-seconds")]
    pub min_seconds: i64,

    /// Value a fresh slider starts from
    #[serde(rename = "initial-seconds")]
    pub initial_seconds: i64,

    /// Small nudge step in seconds
    #[serde(rename = "fine-step")]
    pub fine_step: i64,

    /// Large nudge step in seconds
    #[serde(rename = "coarse-step")]
    pub coarse_step: i64,
}

impl Default for AttemptConfig {
    fn default() -> Self {
        Self {
            min_seconds: 10,
            initial_seconds: 60,
            fine_step: 5,
            coarse_step: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemarkConfig {
    /// Lines appended to a confirmed session summary
    pub celebration: Vec<String>,

    /// Lines appended to a saved result card
    pub motivation: Vec<String>,
}

impl Default for RemarkConfig {
    fn default() -> Self {
        Self {
            celebration: default_celebration(),
            motivation: default_motivation(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path to the attempt ledger database
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("muster")
                .join("attempts.db"),
        }
    }
}

impl Config {
    /// Load configuration, trying several locations in order:
    /// 1. Explicit path if provided
    /// 2. ./.muster.yml
    /// 3. ~/.config/muster/muster.yml
    /// 4. Default configuration
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load_from_file(path);
        }

        let local_path = PathBuf::from(".muster.yml");
        if local_path.exists() {
            match Self::load_from_file(&local_path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load .muster.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir.join("muster").join("muster.yml");
            if user_path.exists() {
                match Self::load_from_file(&user_path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Check that the configuration can actually run the bot
    pub fn validate(&self) -> Result<()> {
        if self.session.min_participants == 0 {
            return Err(eyre::eyre!("session.min-participants must be at least 1"));
        }
        if self.session.horizon_days == 0 {
            return Err(eyre::eyre!("session.horizon-days must be at least 1"));
        }
        if self.session.slots_utc.is_empty() {
            return Err(eyre::eyre!("session.slots-utc must list at least one slot"));
        }
        for slot in &self.session.slots_utc {
            NaiveTime::parse_from_str(slot, "%H:%M")
                .map_err(|_| eyre::eyre!("Invalid slot time (expected HH:MM): {}", slot))?;
        }
        if self.attempt.initial_seconds < self.attempt.min_seconds {
            return Err(eyre::eyre!(
                "attempt.initial-seconds must not be below attempt.min-seconds"
            ));
        }
        if self.attempt.fine_step <= 0 || self.attempt.coarse_step <= 0 {
            return Err(eyre::eyre!("attempt step sizes must be positive"));
        }
        if self.remarks.celebration.is_empty() || self.remarks.motivation.is_empty() {
            return Err(eyre::eyre!("remark pools must not be empty"));
        }
        if self.roster.is_empty() {
            return Err(eyre::eyre!("roster must list at least one participant"));
        }
        if let Some(admin) = &self.admin {
            let admin = admin.to_lowercase();
            let on_roster = self.roster.keys().any(|h| h.to_lowercase() == admin);
            if !on_roster {
                return Err(eyre::eyre!("admin {} is not on the roster", admin));
            }
        }
        if std::env::var(&self.telegram.token_env).is_err() {
            return Err(eyre::eyre!(
                "Environment variable {} not set (required for the bot token)",
                self.telegram.token_env
            ));
        }
        Ok(())
    }
}

fn default_celebration() -> Vec<String> {
    [
        "I work out… so I can eat more later 🍕",
        "My favorite exercise is walking to the fridge 🚶‍♂️",
        "I don’t sweat, I sparkle ✨💦",
        "Gym time: 10% exercise, 90% selfies 🤳",
        "I started running… then I stopped and rested 😅",
        "Yoga is just fancy stretching with calm music 🎶",
        "I lift weights… mostly my own body 🏋️‍♂️",
        "My warm-up is already a workout 😮‍💨",
        "Exercise? I thought you said extra fries 🍟",
        "I run because walking sounds boring 🏃",
        "After leg day, stairs become my enemy 😭",
        "My body says yes, my muscles say no 🙃",
        "I go to the gym to see what not to do 😄",
        "Plank time feels longer than a movie 🎬",
        "I bend so slow, even my thoughts wait 🧘",
        "I train hard… for five minutes 😌",
        "Sport is fun, especially when it’s over 🎉",
        "I count reps like this: one, two, enough 😆",
        "My fitness goal: survive the workout 💀",
        "I stretch because my body makes weird sounds 🤔",
        "Running outside means free air and free pain 😂",
        "I do yoga to lie on the mat and breathe 🌬️",
        "My muscles wake up angry the next day 😠",
        "I train so my clothes still like me 👕",
        "Exercise is my way to balance pizza 🍕⚖️",
        "I move fast… in my dreams 😴",
        "Gym mirrors always lie 🪞",
        "I don’t skip leg day. I just forget 😇",
        "Stretching: when you fight your own body 🤼",
        "I rest between sets like a pro 😎",
        "I run slow, but with style 😏",
        "My trainer says smile. My face disagrees 😬",
        "Yoga pants give me confidence, not skills 😂",
        "I do squats to sit better later 🪑",
        "Sport teaches patience… and pain 😄",
        "I lift weights so gravity knows I’m strong 🌍",
        "My body is fit… fit for a nap 😴",
        "I exercise to feel tired in a new way 🤷",
        "Sweat now, shower later 🚿",
        "I run to escape my problems. They run faster 😆",
        "Gym music makes me stronger… a little 🎧",
        "I stretch and hope for the best 🤞",
        "My balance is good. The floor just moves 🤔",
        "I train because sitting all day is boring 🪑",
        "One more rep? Let me think… no 😄",
        "Yoga helps me find peace… and snacks later 🧘🍪",
        "I exercise so my body doesn’t forget me 😅",
        "Running is easy. Stopping is hard 😮‍💨",
        "I sweat like a hero 💪",
        "Workout done. Reward time! 🍫",
        "I train today so I can complain tomorrow 😜",
        "My muscles need coffee too ☕",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_motivation() -> Vec<String> {
    [
        "Great effort! Keep pushing your limits! 💪",
        "You're getting stronger every day! 🎯",
        "Consistency is key! Come back tomorrow! 🔥",
        "Amazing performance! 🏆",
        "Great effort! Keep your breath calm, 🧘",
        "Strong body, calm mind, always, 💪",
        "You are doing really great today, 🌿",
        "Balance improves with every practice, ⚖️",
        "Breathe in calm, breathe out stress, 🌬️",
        "Slow moves bring strong results, 🧠",
        "Your focus is getting better, ✨",
        "Every pose makes you stronger, 🧍",
        "Nice control, keep breathing smoothly, 😌",
        "Your body trusts you more, 🤍",
        "Small progress is still progress, 🌱",
        "You showed up, that matters, 🙌",
        "Calm breath, steady movement, good, 🧘",
        "Your balance is improving today, ⭐",
        "Gentle practice brings deep strength, 💫",
        "You are moving with purpose, 🎯",
        "Strong legs, relaxed shoulders, nice, 💪",
        "Your patience grows with practice, 🕊️",
        "Feel the stretch, enjoy it, 😊",
        "Mind and body work together, 🧠💪",
        "You are fully present now, 🌼",
        "Each breath supports your movement, 🌬️",
        "Your practice looks calm today, 😌",
        "Nice flow, keep it smooth, 🌊",
        "You are building inner strength, 🔥",
        "Soft face, strong body, perfect, 🙂",
        "Stay steady, stay kind, 🧘",
        "Your focus is really strong, 🎯",
        "Good balance comes with time, ⏳",
        "You are learning with every pose, 📘",
        "Breath leads, body follows, 🌬️",
        "Calm effort brings best results, 🌿",
        "You are doing enough today, 🤍",
        "Nice stretch, stay relaxed, 😄",
        "Your body feels your care, 💖",
        "Slow practice builds deep power, 💪",
        "You look calm and focused, ✨",
        "Every breath makes you steadier, 🕊️",
        "Good energy flows through you, 🌈",
        "Practice complete, well done, 🙏",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.roster.insert("alice".to_string(), 3.0);
        config.roster.insert("bob".to_string(), -5.0);
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.telegram.token_env, "MUSTER_BOT_TOKEN");
        assert_eq!(config.telegram.base_url, "https://api.telegram.org");
        assert_eq!(config.telegram.poll_timeout_secs, 30);
        assert_eq!(config.session.min_participants, 2);
        assert_eq!(config.session.slots_utc.len(), 5);
        assert_eq!(config.session.horizon_days, 7);
        assert_eq!(config.attempt.min_seconds, 10);
        assert_eq!(config.attempt.initial_seconds, 60);
        assert_eq!(config.attempt.fine_step, 5);
        assert_eq!(config.attempt.coarse_step, 10);
        assert!(!config.remarks.celebration.is_empty());
        assert!(!config.remarks.motivation.is_empty());
        assert!(config.roster.is_empty());
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let yaml = r#"
telegram:
  token-env: "OTHER_TOKEN"
  base-url: "https://tg.example.com"
  poll-timeout-secs: 10
session:
  min-participants: 3
  slots-utc: ["06:00", "18:00"]
  horizon-days: 5
attempt:
  min-seconds: 15
  initial-seconds: 45
  fine-step: 1
  coarse-step: 30
remarks:
  celebration: ["nice"]
  motivation: ["keep going"]
ledger:
  path: "/var/lib/muster/attempts.db"
roster:
  alice: 3.0
  bob: -5
admin: alice
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.telegram.token_env, "OTHER_TOKEN");
        assert_eq!(config.telegram.poll_timeout_secs, 10);
        assert_eq!(config.session.min_participants, 3);
        assert_eq!(config.session.slots_utc, vec!["06:00", "18:00"]);
        assert_eq!(config.session.horizon_days, 5);
        assert_eq!(config.attempt.min_seconds, 15);
        assert_eq!(config.attempt.initial_seconds, 45);
        assert_eq!(config.remarks.celebration, vec!["nice"]);
        assert_eq!(config.ledger.path, PathBuf::from("/var/lib/muster/attempts.db"));
        assert_eq!(config.roster.get("alice"), Some(&3.0));
        assert_eq!(config.roster.get("bob"), Some(&-5.0));
        assert_eq!(config.admin.as_deref(), Some("alice"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
roster:
  alice: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.telegram.token_env, "MUSTER_BOT_TOKEN");
        assert_eq!(config.session.min_participants, 2);
        assert_eq!(config.attempt.initial_seconds, 60);
        assert_eq!(config.roster.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_roster() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("roster"));
    }

    #[test]
    fn test_validate_rejects_bad_slot() {
        let mut config = valid_config();
        config.session.slots_utc = vec!["25:99".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("slot"));
    }

    #[test]
    fn test_validate_rejects_initial_below_floor() {
        let mut config = valid_config();
        config.attempt.initial_seconds = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut config = valid_config();
        config.attempt.fine_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_admin() {
        let mut config = valid_config();
        config.admin = Some("mallory".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("admin"));
    }

    #[test]
    fn test_validate_accepts_admin_case_mismatch() {
        let mut config = valid_config();
        config.admin = Some("ALICE".to_string());
        // Fails later on the token env check, not on the admin check
        if let Err(e) = config.validate() {
            assert!(!e.to_string().contains("admin"));
        }
    }
}
