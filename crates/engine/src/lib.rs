use crate::error::EngineError;
use api_client::{Dispatch, SmartTradeClient, TradeApi};
use configuration::Settings;
use core_types::Intent;
use parser::InstructionParser;
use serde::Serialize;
use std::sync::Arc;
use translator::{Payload, Translator};

pub mod error;

/// Everything produced while executing one instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub intent: Intent,
    pub payload: Payload,
    pub dispatch: Dispatch,
}

impl Execution {
    pub fn is_dry_run(&self) -> bool {
        matches!(self.dispatch, Dispatch::DryRun(_))
    }
}

/// Runs the parse -> translate -> send pipeline for single instructions.
///
/// Stateless between calls; the only shared data is the read-only account id
/// and credentials captured at construction.
pub struct TranslatorEngine {
    parser: InstructionParser,
    translator: Translator,
    api: Arc<dyn TradeApi>,
}

impl TranslatorEngine {
    pub fn new(parser: InstructionParser, translator: Translator, api: Arc<dyn TradeApi>) -> Self {
        Self {
            parser,
            translator,
            api,
        }
    }

    /// Wires the production pipeline from validated settings.
    pub fn from_settings(settings: Settings) -> Result<Self, EngineError> {
        let translator = Translator::new(settings.credentials.account_id);
        let client = SmartTradeClient::new(settings.credentials, settings.client)
            .map_err(EngineError::ClientSetup)?;
        Ok(Self::new(InstructionParser::default(), translator, Arc::new(client)))
    }

    /// Parses and translates without sending anything.
    pub fn plan(&self, instruction: &str) -> Result<(Intent, Payload), EngineError> {
        let intent = self.parser.parse(instruction)?;
        let payload = self.translator.translate(&intent);
        tracing::info!(%intent, endpoint = %payload.endpoint, "Instruction translated.");
        Ok((intent, payload))
    }

    pub async fn execute(&self, instruction: &str, dry_run: bool) -> Result<Execution, EngineError> {
        let (intent, payload) = self.plan(instruction)?;
        let dispatch = self.api.send(&payload, dry_run).await?;

        Ok(Execution {
            intent,
            payload,
            dispatch,
        })
    }
}
