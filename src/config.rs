use crate::{evaluation_logger::NoopEvaluationLogger, Client, EvaluationLogger};

/// Configuration for [`Client`].
pub struct ClientConfig<'a> {
    pub(crate) evaluation_logger: Box<dyn EvaluationLogger + Send + Sync + 'a>,
}

impl<'a> Default for ClientConfig<'a> {
    fn default() -> Self {
        ClientConfig::new()
    }
}

impl<'a> ClientConfig<'a> {
    /// Create a default configuration. Evaluations are not logged.
    ///
    /// ```
    /// # use lightswitch::ClientConfig;
    /// ClientConfig::new();
    /// ```
    pub fn new() -> Self {
        ClientConfig {
            evaluation_logger: Box::new(NoopEvaluationLogger),
        }
    }

    /// Set evaluation logger to pass evaluations to your data warehouse.
    ///
    /// ```
    /// # use lightswitch::{ClientConfig, EvaluationEvent};
    /// let mut config = ClientConfig::new();
    /// config.evaluation_logger(|event: EvaluationEvent| {
    ///   println!("{:?}", event);
    /// });
    /// ```
    pub fn evaluation_logger(
        &mut self,
        evaluation_logger: impl EvaluationLogger + Send + Sync + 'a,
    ) -> &mut Self {
        self.evaluation_logger = Box::new(evaluation_logger);
        self
    }

    /// Create a new [`Client`] using the specified configuration.
    ///
    /// ```
    /// # use lightswitch::{Client, ClientConfig};
    /// let client: Client = ClientConfig::new().to_client();
    /// ```
    pub fn to_client(self) -> Client<'a> {
        Client::new(self)
    }
}
