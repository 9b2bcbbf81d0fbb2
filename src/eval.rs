use serde::{Deserialize, Serialize};

use crate::{
    sharder::{bucket_with, variation_for_bucket, Md5Sharder, Sharder},
    Error, Flag, FlagType, FlagValue, Result, UserContext,
};

/// Rust types a flag can be evaluated as.
///
/// Each type corresponds to exactly one [`FlagType`]; evaluating a flag as a type that does not
/// correspond to its declared type fails with [`Error::TypeMismatch`].
pub trait FromFlagValue: Sized {
    /// Flag type this Rust type is read from.
    const FLAG_TYPE: FlagType;

    /// Extract the value. Returns `None` if `value` holds another type.
    fn from_flag_value(value: FlagValue) -> Option<Self>;
}

impl FromFlagValue for bool {
    const FLAG_TYPE: FlagType = FlagType::Boolean;

    fn from_flag_value(value: FlagValue) -> Option<Self> {
        value.as_boolean()
    }
}

impl FromFlagValue for i64 {
    const FLAG_TYPE: FlagType = FlagType::Integer;

    fn from_flag_value(value: FlagValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromFlagValue for String {
    const FLAG_TYPE: FlagType = FlagType::String;

    fn from_flag_value(value: FlagValue) -> Option<Self> {
        match value {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Why an evaluation produced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvaluationReason {
    /// The flag is inactive and served its default value.
    Disabled,
    /// The keyword at `index` matched the user.
    Keyword {
        #[allow(missing_docs)]
        index: usize,
    },
    /// No keyword matched; the user's bucket fell into the variation at `index`.
    Variation {
        #[allow(missing_docs)]
        index: usize,
    },
    /// No keyword matched; the user's bucket fell into the default value's portion.
    DefaultPortion,
    /// No keyword matched and no range covers the user's bucket, so the default value was served.
    Fallthrough,
}

/// Evaluation result along with how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetails {
    /// Value, typed according to the flag's declared type.
    pub value: FlagValue,
    #[allow(missing_docs)]
    pub reason: EvaluationReason,
    /// Bucket of the user, if percentage rollout was consulted.
    pub bucket: Option<u64>,
}

impl Flag {
    /// Evaluate the flag for `user` as type `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if `T` does not correspond to the flag's declared type.
    /// - [`Error::CoercionFailure`] if the selected value can not be parsed as the declared type.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lightswitch::{Flag, FlagType, Keyword, Property, UserContext};
    /// let mut flag = Flag::new("beta", FlagType::Boolean, "false");
    /// flag.keywords.push(Keyword::new([Property::new("tier", "beta")], "true"));
    ///
    /// let user = UserContext::builder("user-1").property("tier", "beta").build();
    /// assert_eq!(flag.evaluate::<bool>(&user).unwrap(), true);
    /// assert!(flag.evaluate::<i64>(&user).is_err());
    /// ```
    pub fn evaluate<T: FromFlagValue>(&self, user: &UserContext) -> Result<T> {
        self.check_type(T::FLAG_TYPE)?;
        let details = self.evaluate_details(user)?;
        T::from_flag_value(details.value).ok_or(Error::TypeMismatch {
            expected: T::FLAG_TYPE,
            found: self.flag_type,
        })
    }

    /// Evaluate the flag for `user`, returning the value with its declared type and the reason it
    /// was selected.
    ///
    /// # Errors
    ///
    /// [`Error::CoercionFailure`] if the selected value can not be parsed as the declared type.
    pub fn evaluate_details(&self, user: &UserContext) -> Result<EvaluationDetails> {
        self.evaluate_details_with(user, &Md5Sharder)
    }

    pub(crate) fn evaluate_details_with(
        &self,
        user: &UserContext,
        sharder: &impl Sharder,
    ) -> Result<EvaluationDetails> {
        let (raw, reason, bucket) = if self.active {
            self.calc_value(user, sharder)
        } else {
            (self.default_value.as_str(), EvaluationReason::Disabled, None)
        };

        let value = value_with_type(self.flag_type, raw)?;
        Ok(EvaluationDetails {
            value,
            reason,
            bucket,
        })
    }

    /// Select the raw value for an active flag: first matching keyword, otherwise the user's
    /// percentage bucket.
    pub(crate) fn calc_value(
        &self,
        user: &UserContext,
        sharder: &impl Sharder,
    ) -> (&str, EvaluationReason, Option<u64>) {
        if let Some((index, keyword)) = self
            .keywords
            .iter()
            .enumerate()
            .find(|(_, keyword)| keyword.matches(user))
        {
            return (
                keyword.value.as_str(),
                EvaluationReason::Keyword { index },
                None,
            );
        }

        let bucket = bucket_with(sharder, user.id());
        let (value, reason) = match variation_for_bucket(&self.variations, bucket) {
            Some((index, variation)) => (
                variation.value.as_str(),
                EvaluationReason::Variation { index },
            ),
            None if bucket < self.variations_total() + u64::from(self.default_percentage) => (
                self.default_value.as_str(),
                EvaluationReason::DefaultPortion,
            ),
            None => (self.default_value.as_str(), EvaluationReason::Fallthrough),
        };

        (value, reason, Some(bucket))
    }

    fn variations_total(&self) -> u64 {
        self.variations
            .iter()
            .map(|variation| u64::from(variation.percentage))
            .sum()
    }

    pub(crate) fn check_type(&self, expected: FlagType) -> Result<()> {
        if self.flag_type == expected {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected,
                found: self.flag_type,
            })
        }
    }
}

/// Parse a raw flag value as `flag_type`.
///
/// Booleans are `true`/`false` in any case, integers are base-10 `i64`, strings are taken as is.
pub(crate) fn value_with_type(flag_type: FlagType, raw: &str) -> Result<FlagValue> {
    let coercion_failure = || Error::CoercionFailure {
        flag_type,
        value: raw.to_owned(),
    };

    match flag_type {
        FlagType::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(FlagValue::Boolean(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(FlagValue::Boolean(false))
            } else {
                Err(coercion_failure())
            }
        }
        FlagType::Integer => raw
            .parse::<i64>()
            .map(FlagValue::Integer)
            .map_err(|_| coercion_failure()),
        FlagType::String => Ok(FlagValue::String(raw.to_owned())),
    }
}
