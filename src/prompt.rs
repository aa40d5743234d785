use crate::config::{MqttConfig, DEFAULT_MQTT_PORT, DEFAULT_MQTT_QOS};
use crate::hash;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

pub static DEFAULT_PLATFORM_NAME: &str = "Trannergy";
pub static DEFAULT_MQTT_BROKER: &str = "localhost";
pub static DEFAULT_MQTT_TOPIC: &str = "solarmanpv";

/// Reads one line of sensitive input without echoing it. Kept as a plain
/// function pointer so tests can swap in a canned value.
pub type SecretFn = fn(&str) -> io::Result<String>;

/// Line-oriented prompter over arbitrary reader/writer pairs. Production
/// code runs it on stdin/stdout; tests feed it a `Cursor`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    read_secret: SecretFn,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        // rpassword puts the terminal into no-echo mode and restores it on
        // every exit path, including interrupts mid-read.
        Self::new(io::stdin().lock(), io::stdout(), |label| {
            rpassword::prompt_password(label)
        })
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, read_secret: SecretFn) -> Self {
        Self {
            input,
            output,
            read_secret,
        }
    }

    fn read_line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut buffer = String::new();
        self.input.read_line(&mut buffer).context("read input")?;
        Ok(buffer.trim().to_string())
    }

    /// Free-form value, empty input allowed.
    pub fn text(&mut self, label: &str) -> Result<String> {
        self.read_line(label)
    }

    /// Free-form value falling back to `default` on an empty line.
    pub fn text_or(&mut self, label: &str, default: &str) -> Result<String> {
        let entered = self.read_line(label)?;
        Ok(if entered.is_empty() {
            default.to_string()
        } else {
            entered
        })
    }

    /// Value the user may skip entirely with an empty line.
    pub fn optional(&mut self, label: &str) -> Result<Option<String>> {
        let entered = self.read_line(label)?;
        Ok((!entered.is_empty()).then_some(entered))
    }

    /// Integer the user may skip with an empty line.
    pub fn optional_u64(&mut self, label: &str) -> Result<Option<u64>> {
        match self.read_line(label)?.as_str() {
            "" => Ok(None),
            entered => entered
                .parse()
                .map(Some)
                .with_context(|| format!("not a valid integer: {entered:?}")),
        }
    }

    /// Port number falling back to `default` on an empty line.
    pub fn port_or(&mut self, label: &str, default: u16) -> Result<u16> {
        match self.read_line(label)?.as_str() {
            "" => Ok(default),
            entered => entered
                .parse()
                .with_context(|| format!("not a valid port: {entered:?}")),
        }
    }

    /// Non-echoed value, required.
    pub fn secret(&mut self, label: &str) -> Result<String> {
        (self.read_secret)(label).context("read password")
    }

    /// Non-echoed value the user may skip with an empty line.
    pub fn optional_secret(&mut self, label: &str) -> Result<Option<String>> {
        let entered = self.secret(label)?;
        Ok((!entered.is_empty()).then_some(entered))
    }
}

/// Identity and platform values entered before any network call. The
/// plaintext password is hashed on the spot and never stored.
pub struct AccountDetails {
    pub name: String,
    pub appid: String,
    pub secret: String,
    pub username: String,
    pub passhash: String,
}

pub fn collect_account<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<AccountDetails> {
    let name = prompter.text_or(
        "Enter platform name (default: Trannergy): ",
        DEFAULT_PLATFORM_NAME,
    )?;
    let appid = prompter.text("Enter your APPID: ")?;
    let secret = prompter.text("Enter your APPSECRET: ")?;
    let username = prompter.text("Enter your username (email): ")?;
    let password = prompter.secret("Enter your password (will be hashed): ")?;
    Ok(AccountDetails {
        name,
        appid,
        secret,
        username,
        passhash: hash::passhash(&password),
    })
}

pub fn collect_meter_id<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<u64>> {
    prompter.optional_u64("Enter meterId (optional, press Enter to skip): ")
}

pub fn collect_mqtt<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<MqttConfig> {
    let broker = prompter.text_or("MQTT broker address [default: localhost]: ", DEFAULT_MQTT_BROKER)?;
    let port = prompter.port_or("MQTT port [default: 1883]: ", DEFAULT_MQTT_PORT)?;
    let topic = prompter.text_or("MQTT topic [default: solarmanpv]: ", DEFAULT_MQTT_TOPIC)?;
    let username = prompter.optional("MQTT username (optional): ")?;
    let password = prompter.optional_secret("MQTT password (optional): ")?;
    Ok(MqttConfig {
        broker,
        port,
        topic,
        username,
        password,
        qos: DEFAULT_MQTT_QOS,
        retain: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn canned_secret(_label: &str) -> io::Result<String> {
        Ok("stub-secret".to_string())
    }

    fn no_secret(_label: &str) -> io::Result<String> {
        Ok(String::new())
    }

    fn prompter(input: &str, read_secret: SecretFn) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), read_secret)
    }

    #[test]
    fn empty_line_selects_default() {
        let mut p = prompter("\n", canned_secret);
        assert_eq!(p.text_or("name: ", "Trannergy").unwrap(), "Trannergy");
    }

    #[test]
    fn entered_value_overrides_default() {
        let mut p = prompter("Solarman\n", canned_secret);
        assert_eq!(p.text_or("name: ", "Trannergy").unwrap(), "Solarman");
    }

    #[test]
    fn optional_is_skipped_on_empty_line() {
        let mut p = prompter("\nmqtt-user\n", canned_secret);
        assert_eq!(p.optional("username: ").unwrap(), None);
        assert_eq!(p.optional("username: ").unwrap(), Some("mqtt-user".to_string()));
    }

    #[test]
    fn integers_parse_or_fail() {
        let mut p = prompter("123\n\nabc\n", canned_secret);
        assert_eq!(p.optional_u64("meterId: ").unwrap(), Some(123));
        assert_eq!(p.optional_u64("meterId: ").unwrap(), None);
        assert!(p.optional_u64("meterId: ").is_err());
    }

    #[test]
    fn port_defaults_and_rejects_garbage() {
        let mut p = prompter("\n8883\nnope\n", canned_secret);
        assert_eq!(p.port_or("port: ", 1883).unwrap(), 1883);
        assert_eq!(p.port_or("port: ", 1883).unwrap(), 8883);
        assert!(p.port_or("port: ", 1883).is_err());
    }

    #[test]
    fn account_collection_hashes_the_password() {
        let input = "\nAPP\nSECRET\nu@e.com\n";
        let mut p = prompter(input, canned_secret);
        let account = collect_account(&mut p).unwrap();
        assert_eq!(account.name, "Trannergy");
        assert_eq!(account.appid, "APP");
        assert_eq!(account.secret, "SECRET");
        assert_eq!(account.username, "u@e.com");
        assert_eq!(account.passhash, crate::hash::passhash("stub-secret"));
        assert_ne!(account.passhash, "stub-secret");
    }

    #[test]
    fn mqtt_collection_applies_defaults_and_constants() {
        // broker, port, topic, username all empty; password via stub
        let mut p = prompter("\n\n\n\n", no_secret);
        let mqtt = collect_mqtt(&mut p).unwrap();
        assert_eq!(mqtt.broker, "localhost");
        assert_eq!(mqtt.port, 1883);
        assert_eq!(mqtt.topic, "solarmanpv");
        assert_eq!(mqtt.username, None);
        assert_eq!(mqtt.password, None);
        assert_eq!(mqtt.qos, 1);
        assert!(mqtt.retain);
    }
}
