use std::sync::Arc;

use chrono::Utc;

use crate::{
    eval::FromFlagValue, ClientConfig, Error, EvaluationEvent, Flag, FlagEvent, FlagStore,
    FlagType, FlagValue, Result, Snapshot, UserContext,
};

/// A Lightswitch client.
///
/// The client owns a [`FlagStore`]. The transport receiving data from the management service
/// feeds it through [`Client::init`] and [`Client::handle_event`] (or directly through the store
/// returned by [`Client::flag_store`]), while application code reads flag values with the typed
/// getters.
///
/// # Examples
/// ```
/// # use lightswitch::{Client, ClientConfig, Flag, FlagType, Snapshot, UserContext};
/// let client = Client::new(ClientConfig::new());
/// client.init(Snapshot::Flags(vec![Flag::new("dark-mode", FlagType::Boolean, "true")]));
///
/// let enabled = client
///     .get_boolean_value("dark-mode", &UserContext::new("user-1"))
///     .unwrap_or_default()
///     .unwrap_or(false);
/// assert!(enabled);
/// ```
pub struct Client<'a> {
    flag_store: Arc<FlagStore>,
    config: ClientConfig<'a>,
}

impl<'a> Client<'a> {
    /// Create a new `Client` with an empty flag store.
    pub fn new(config: ClientConfig<'a>) -> Self {
        Client::new_with_flag_store(config, Arc::new(FlagStore::new()))
    }

    /// Create a new `Client` reading from an existing flag store.
    pub fn new_with_flag_store(config: ClientConfig<'a>, flag_store: Arc<FlagStore>) -> Self {
        Client { flag_store, config }
    }

    /// The store this client evaluates against.
    pub fn flag_store(&self) -> Arc<FlagStore> {
        self.flag_store.clone()
    }

    /// Replace all flags with the given snapshot.
    pub fn init(&self, snapshot: Snapshot) {
        self.flag_store.replace_all(snapshot.into_flags());
    }

    /// Apply an event pushed by the management service.
    pub fn handle_event(&self, event: FlagEvent) {
        log::trace!(target: "lightswitch", event:serde; "applying flag event");
        self.flag_store.apply_event(event);
    }

    /// Get the flag with the given title.
    ///
    /// # Errors
    ///
    /// [`Error::FlagNotFound`] if the store does not know the flag.
    pub fn get_flag(&self, title: &str) -> Result<Arc<Flag>> {
        self.flag_store.get(title).ok_or(Error::FlagNotFound)
    }

    /// Evaluate the flag `title` for `user`, returning the value with the flag's declared type.
    ///
    /// Returns `Ok(None)` if the flag is unknown.
    ///
    /// # Errors
    ///
    /// [`Error::CoercionFailure`] if the flag holds a value that can not be parsed as its
    /// declared type.
    pub fn get_value(&self, title: &str, user: &UserContext) -> Result<Option<FlagValue>> {
        self.get_value_inner(title, user, None)
    }

    /// Evaluate the flag `title` for `user` as `T`.
    ///
    /// Returns `Ok(None)` if the flag is unknown.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if `T` does not correspond to the flag's declared type.
    /// - [`Error::CoercionFailure`] if the selected value can not be parsed as the declared type.
    pub fn get_typed_value<T: FromFlagValue>(
        &self,
        title: &str,
        user: &UserContext,
    ) -> Result<Option<T>> {
        let Some(value) = self.get_value_inner(title, user, Some(T::FLAG_TYPE))? else {
            return Ok(None);
        };

        let found = value.flag_type();
        T::from_flag_value(value)
            .map(Some)
            .ok_or(Error::TypeMismatch {
                expected: T::FLAG_TYPE,
                found,
            })
    }

    /// Evaluate a boolean flag. See [`Client::get_typed_value`].
    pub fn get_boolean_value(&self, title: &str, user: &UserContext) -> Result<Option<bool>> {
        self.get_typed_value(title, user)
    }

    /// Evaluate an integer flag. See [`Client::get_typed_value`].
    pub fn get_integer_value(&self, title: &str, user: &UserContext) -> Result<Option<i64>> {
        self.get_typed_value(title, user)
    }

    /// Evaluate a string flag. See [`Client::get_typed_value`].
    pub fn get_string_value(&self, title: &str, user: &UserContext) -> Result<Option<String>> {
        self.get_typed_value(title, user)
    }

    fn get_value_inner(
        &self,
        title: &str,
        user: &UserContext,
        expected_type: Option<FlagType>,
    ) -> Result<Option<FlagValue>> {
        let Some(flag) = self.flag_store.get(title) else {
            log::debug!(target: "lightswitch", title, user = user.id(); "evaluating an unknown flag");
            return Ok(None);
        };

        let details = expected_type
            .map_or(Ok(()), |expected| flag.check_type(expected))
            .and_then(|()| flag.evaluate_details(user))
            .inspect_err(|err| {
                log::warn!(target: "lightswitch",
                    title,
                    user:serde;
                    "error occurred while evaluating a flag: {:?}", err,
                );
            })?;

        log::trace!(target: "lightswitch",
                    title,
                    user:serde,
                    value:serde = &details.value,
                    reason:serde = &details.reason;
                    "evaluated a flag");

        self.config
            .evaluation_logger
            .log_evaluation(EvaluationEvent {
                flag: flag.title.clone(),
                flag_version: flag.version,
                user: user.id().to_owned(),
                value: details.value.clone(),
                reason: details.reason,
                timestamp: Utc::now().to_rfc3339(),
            });

        Ok(Some(details.value))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        ClientConfig, Error, EvaluationEvent, EvaluationReason, Flag, FlagEvent, FlagStore,
        FlagTitle, FlagType, FlagValue, Keyword, Property, Snapshot, UserContext, Variation,
    };

    use super::Client;

    fn member_flag() -> Flag {
        Flag {
            keywords: vec![Keyword::new(
                [Property::new("name", "Lee"), Property::new("title", "member")],
                "true",
            )],
            variations: vec![Variation::new("false", 100)],
            ..Flag::new("member-flag", FlagType::Boolean, "true")
        }
    }

    #[test]
    fn returns_none_while_no_flags() {
        let client = Client::new(ClientConfig::new());

        assert_eq!(
            client
                .get_value("flag", &UserContext::new("subject"))
                .unwrap(),
            None
        );
        assert!(matches!(client.get_flag("flag"), Err(Error::FlagNotFound)));
    }

    #[test]
    fn returns_flag_value_once_flags_are_stored() {
        let flag_store = Arc::new(FlagStore::new());
        let client = Client::new_with_flag_store(ClientConfig::new(), flag_store.clone());

        // updating flags after client is created
        flag_store.replace_all([member_flag()]);

        let member = UserContext::builder("1")
            .property("name", "Lee")
            .property("title", "member")
            .build();
        assert_eq!(
            client.get_boolean_value("member-flag", &member).unwrap(),
            Some(true)
        );
        assert_eq!(
            client
                .get_boolean_value("member-flag", &UserContext::new("1"))
                .unwrap(),
            Some(false)
        );
    }

    #[test]
    fn typed_getters_reject_other_types() {
        let client = Client::new(ClientConfig::new());
        client.init(Snapshot::Flags(vec![
            Flag::new("bool", FlagType::Boolean, "true"),
            Flag::new("int", FlagType::Integer, "1"),
        ]));
        let user = UserContext::new("1");

        assert!(matches!(
            client.get_integer_value("bool", &user),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            client.get_string_value("bool", &user),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            client.get_boolean_value("int", &user),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(client.get_integer_value("int", &user).unwrap(), Some(1));
        assert_eq!(
            client.get_value("int", &user).unwrap(),
            Some(FlagValue::Integer(1))
        );
    }

    #[test]
    fn events_update_evaluations() {
        let client = Client::new(ClientConfig::new());
        let user = UserContext::new("1");

        client.handle_event(FlagEvent::Create(Flag::new(
            "color",
            FlagType::String,
            "red",
        )));
        assert_eq!(
            client.get_string_value("color", &user).unwrap().as_deref(),
            Some("red")
        );

        client.handle_event(FlagEvent::Update(Flag::new(
            "color",
            FlagType::String,
            "blue",
        )));
        assert_eq!(
            client.get_string_value("color", &user).unwrap().as_deref(),
            Some("blue")
        );

        client.handle_event(FlagEvent::Delete(FlagTitle {
            title: "color".to_owned(),
        }));
        assert_eq!(client.get_string_value("color", &user).unwrap(), None);
    }

    #[test]
    fn clients_do_not_share_flags() {
        let first = Client::new(ClientConfig::new());
        let second = Client::new(ClientConfig::new());
        first.init(Snapshot::Flags(vec![member_flag()]));

        assert!(first.flag_store().get("member-flag").is_some());
        assert!(second.flag_store().is_empty());
    }

    #[test]
    fn logs_evaluations() {
        let events = Arc::new(Mutex::new(Vec::<EvaluationEvent>::new()));
        let mut config = ClientConfig::new();
        {
            let events = events.clone();
            config.evaluation_logger(move |event: EvaluationEvent| events.lock().unwrap().push(event));
        }
        let client = config.to_client();
        client.init(Snapshot::Flags(vec![member_flag().with_active(false)]));

        client
            .get_boolean_value("member-flag", &UserContext::new("1"))
            .unwrap();
        // Failed and unknown evaluations are not logged.
        let _ = client.get_integer_value("member-flag", &UserContext::new("1"));
        client
            .get_boolean_value("unknown", &UserContext::new("1"))
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].flag, "member-flag");
        assert_eq!(events[0].user, "1");
        assert_eq!(events[0].value, FlagValue::Boolean(true));
        assert_eq!(events[0].reason, EvaluationReason::Disabled);
    }
}
