//! Deployments and tools the wizard knows about, and the secrets each one needs
//!
//! To support a new deployment, add a variant to [`DeploymentName`] and list its
//! secrets in [`DeploymentName::secrets`]. Deployments that need more than a plain
//! prompt per secret return a custom [`SecretPrompt`].

use std::fmt;

pub const DATABASE_URL_DEFAULT: &str = "sqlite://toolkit.db";
pub const NEXT_PUBLIC_API_HOSTNAME_DEFAULT: &str = "http://localhost:8000";

pub const DOT_ENV_FILE_PATH: &str = ".env";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretPrompt {
    /// One required text prompt per secret.
    Plain,
    /// Cohere API key, with a pointer to where keys are issued.
    CohereApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentName {
    CoherePlatform,
    SageMaker,
    Azure,
}

impl DeploymentName {
    pub const ALL: [DeploymentName; 3] = [
        DeploymentName::CoherePlatform,
        DeploymentName::SageMaker,
        DeploymentName::Azure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeploymentName::CoherePlatform => "Cohere Platform",
            DeploymentName::SageMaker => "SageMaker",
            DeploymentName::Azure => "Azure",
        }
    }

    pub fn secrets(self) -> &'static [&'static str] {
        match self {
            DeploymentName::CoherePlatform => &["COHERE_API_KEY"],
            DeploymentName::SageMaker => &[
                "SAGE_MAKER_PROFILE_NAME",
                "SAGE_MAKER_REGION_NAME",
                "SAGE_MAKER_ENDPOINT_NAME",
            ],
            DeploymentName::Azure => &["AZURE_API_KEY", "AZURE_CHAT_ENDPOINT_URL"],
        }
    }

    pub fn secret_prompt(self) -> SecretPrompt {
        match self {
            DeploymentName::CoherePlatform => SecretPrompt::CohereApiKey,
            DeploymentName::SageMaker | DeploymentName::Azure => SecretPrompt::Plain,
        }
    }

    /// Whether the deployment is pre-selected in the deployment prompt.
    pub fn selected_by_default(self) -> bool {
        self == DeploymentName::CoherePlatform
    }

    pub fn from_label(label: &str) -> Option<DeploymentName> {
        Self::ALL
            .into_iter()
            .find(|deployment| deployment.label() == label)
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    PythonInterpreter,
    TavilyInternetSearch,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::PythonInterpreter, ToolName::TavilyInternetSearch];

    pub fn label(self) -> &'static str {
        match self {
            ToolName::PythonInterpreter => "Python Interpreter",
            ToolName::TavilyInternetSearch => "Tavily Internet Search",
        }
    }

    pub fn secrets(self) -> &'static [&'static str] {
        match self {
            ToolName::PythonInterpreter => &["PYTHON_INTERPRETER_URL"],
            ToolName::TavilyInternetSearch => &["TAVILY_API_KEY"],
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
