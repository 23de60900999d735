//! The setup wizard: a fixed sequence of prompts ending in a written `.env`

use crate::config::DATABASE_URL;
use crate::setup::SetupError;
use crate::setup::catalog::{
    DATABASE_URL_DEFAULT, DeploymentName, NEXT_PUBLIC_API_HOSTNAME_DEFAULT, SecretPrompt,
    ToolName,
};
use crate::setup::env_file::EnvFile;
use crate::setup::prompter::{Prompter, Tone};
use log::info;

pub const NEXT_PUBLIC_API_HOSTNAME: &str = "NEXT_PUBLIC_API_HOSTNAME";

const COHERE_API_KEY: &str = "COHERE_API_KEY";

/// Collected key/value pairs, in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    entries: Vec<(String, String)>,
}

impl Secrets {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a completed run wrote.
#[derive(Debug, Clone)]
pub struct SetupSummary {
    pub secrets: Secrets,
    pub deployments: Vec<DeploymentName>,
}

pub struct Wizard<P> {
    prompter: P,
    env_file: EnvFile,
}

impl<P: Prompter> Wizard<P> {
    pub fn new(prompter: P, env_file: EnvFile) -> Self {
        Wizard { prompter, env_file }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    pub fn run(&mut self) -> Result<SetupSummary, SetupError> {
        let mut secrets = Secrets::default();
        self.prompter.say(
            Tone::Highlight,
            "👋 First things first, let's set up your environment.",
        );

        self.database_url_prompt(&mut secrets)?;

        for tool in ToolName::ALL {
            self.tool_prompt(&mut secrets, tool)?;
        }

        let deployments = self.select_deployments_prompt()?;
        for &deployment in &deployments {
            self.deployment_prompt(&mut secrets, deployment)?;
        }

        self.write_env_file(&secrets)?;

        let to_update = self.review_variables_prompt(&secrets)?;
        self.update_variable_prompt(&mut secrets, &to_update)?;

        self.prompter
            .say(Tone::Success, "✅ Your .env file has been set up.");

        self.wrap_up(&deployments);
        self.show_examples();

        info!(
            "wrote {} variables to {}",
            secrets.len(),
            self.env_file.path().display()
        );

        Ok(SetupSummary {
            secrets,
            deployments,
        })
    }

    fn database_url_prompt(&mut self, secrets: &mut Secrets) -> Result<(), SetupError> {
        self.prompter
            .say(Tone::Plain, "💾 We need to set up your database URL.");
        let database_url = self.prompter.input(
            "Enter your database URL or press enter for default [recommended]",
            Some(DATABASE_URL_DEFAULT),
            false,
        )?;

        self.prompter
            .say(Tone::Plain, "💾 Now, let's set up your public API Hostname");
        let api_hostname = self.prompter.input(
            "Enter your public API Hostname or press enter for default [recommended]",
            Some(NEXT_PUBLIC_API_HOSTNAME_DEFAULT),
            false,
        )?;

        secrets.set(DATABASE_URL, or_default(database_url, DATABASE_URL_DEFAULT));
        secrets.set(
            NEXT_PUBLIC_API_HOSTNAME,
            or_default(api_hostname, NEXT_PUBLIC_API_HOSTNAME_DEFAULT),
        );
        Ok(())
    }

    fn tool_prompt(&mut self, secrets: &mut Secrets, tool: ToolName) -> Result<(), SetupError> {
        self.prompter.say(
            Tone::Plain,
            &format!(
                "🛠️ If you want to enable {tool}, set up the following secrets. Otherwise, press enter."
            ),
        );

        for secret in tool.secrets() {
            let value = self
                .prompter
                .input(&format!("Enter the value for {secret}"), None, false)?;
            secrets.set(*secret, value);
        }
        Ok(())
    }

    fn select_deployments_prompt(&mut self) -> Result<Vec<DeploymentName>, SetupError> {
        self.prompter
            .say(Tone::Highlight, "🚀 Let's set up your deployments.");

        let labels: Vec<String> = DeploymentName::ALL
            .iter()
            .map(|deployment| deployment.label().to_owned())
            .collect();
        let defaults: Vec<bool> = DeploymentName::ALL
            .iter()
            .map(|deployment| deployment.selected_by_default())
            .collect();

        loop {
            let selection = self.prompter.multi_select(
                "Select the deployments you want to set up",
                &labels,
                &defaults,
            )?;

            let deployments: Vec<DeploymentName> = selection
                .into_iter()
                .filter_map(|index| DeploymentName::ALL.get(index).copied())
                .collect();

            if !deployments.is_empty() {
                return Ok(deployments);
            }

            self.prompter
                .say(Tone::Plain, "Please select at least one deployment.");
        }
    }

    fn deployment_prompt(
        &mut self,
        secrets: &mut Secrets,
        deployment: DeploymentName,
    ) -> Result<(), SetupError> {
        match deployment.secret_prompt() {
            SecretPrompt::CohereApiKey => self.cohere_api_key_prompt(secrets),
            SecretPrompt::Plain => {
                for secret in deployment.secrets() {
                    let value = self.prompter.input(
                        &format!("Enter the value for {secret}"),
                        None,
                        true,
                    )?;
                    secrets.set(*secret, value);
                }
                Ok(())
            }
        }
    }

    fn cohere_api_key_prompt(&mut self, secrets: &mut Secrets) -> Result<(), SetupError> {
        self.prompter.say(
            Tone::Plain,
            "🔐 Enter your Cohere API key. You can get one at https://dashboard.cohere.com/api-keys",
        );
        let value = self
            .prompter
            .input(&format!("Enter the value for {COHERE_API_KEY}"), None, true)?;
        secrets.set(COHERE_API_KEY, value);
        Ok(())
    }

    fn write_env_file(&mut self, secrets: &Secrets) -> Result<(), SetupError> {
        for (key, value) in secrets.iter() {
            self.prompter.say(
                Tone::Plain,
                &format!(
                    "🔑 Setting {key} in {} file.",
                    self.env_file.path().display()
                ),
            );
            self.env_file.set_key(key, value)?;
        }
        Ok(())
    }

    /// Returns the keys the user wants to change.
    fn review_variables_prompt(&mut self, secrets: &Secrets) -> Result<Vec<String>, SetupError> {
        let review_list: Vec<String> = secrets
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        let defaults = vec![false; review_list.len()];

        let selection = self.prompter.multi_select(
            "Review your variables and select the ones you want to update, if any",
            &review_list,
            &defaults,
        )?;

        let keys: Vec<&str> = secrets.iter().map(|(key, _)| key).collect();
        Ok(selection
            .into_iter()
            .filter_map(|index| keys.get(index).map(|key| (*key).to_owned()))
            .collect())
    }

    fn update_variable_prompt(
        &mut self,
        secrets: &mut Secrets,
        keys: &[String],
    ) -> Result<(), SetupError> {
        for key in keys {
            let value = self
                .prompter
                .input(&format!("Enter the new value for {key}"), None, false)?;
            self.env_file.set_key(key, &value)?;
            self.prompter
                .say(Tone::Success, &format!("🪛 Updated {key} to {value}."));
            secrets.set(key.as_str(), value);
        }
        Ok(())
    }

    fn wrap_up(&mut self, deployments: &[DeploymentName]) {
        self.prompter.say(
            Tone::Success,
            "🎉 You're all set up! You can now run 'make migrate' and 'make dev' to start the toolkit. Make sure Docker is running.",
        );

        if deployments.contains(&DeploymentName::SageMaker) {
            self.prompter.say(
                Tone::Success,
                "🔑 For SageMaker ensure you have run `aws configure` before make dev for authentication",
            );
        }
    }

    fn show_examples(&mut self) {
        let examples = [
            (Tone::Example, "📚 Here are some examples to get you started:"),
            (Tone::Example, "1. Navigate to the toolkit frontend: "),
            (Tone::Example, "\thttp://localhost:4000"),
            (Tone::Example, "2. Start a conversation"),
            (
                Tone::Example,
                "\tcurl --location 'http://localhost:8000/conversations' --header 'User-Id: test-user' --header 'Content-Type: application/json' --data '{\"title\": \"hey\"}'",
            ),
            (Tone::Example, "3. Add a message to it"),
            (
                Tone::Example,
                "\tcurl --location 'http://localhost:8000/conversations/<conversation id>/messages' --header 'User-Id: test-user' --header 'Content-Type: application/json' --data '{\"text\": \"hey\"}'",
            ),
            (Tone::Example, "4. List your conversations"),
            (
                Tone::Example,
                "\tcurl http://localhost:8000/conversations --header 'User-Id: test-user'",
            ),
            (Tone::Highlight, "For more examples, visit the toolkit README.md"),
        ];

        for (tone, line) in examples {
            self.prompter.say(tone, line);
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_owned()
    } else {
        value
    }
}
