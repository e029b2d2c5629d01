use formbind_binder::{
    Binder, BinderConfig, BinderError, BindingConfiguration, BindingOrigin, FailureKind,
    SubmittedValue, UserValue, UserValues,
};
use formbind_format::{DATE_FORMAT_MARKER, FormatError, Formatter, FormatterRegistry, IntegerFormatter};
use formbind_model::{JsonModel, Model, ModelError, ModelSchema, PropertyDescriptor};
use formbind_types::{Annotation, PropertyType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn person_schema() -> ModelSchema {
    ModelSchema::new("person")
        .with_property(PropertyDescriptor::text("name"))
        .with_property(PropertyDescriptor::integer("age"))
        .with_property(PropertyDescriptor::bool("active"))
        .with_property(PropertyDescriptor::decimal("balance"))
        .with_property(PropertyDescriptor::date("birthday"))
        .with_property(PropertyDescriptor::date_time("last_login"))
        .with_property(PropertyDescriptor::list("tags", PropertyType::Text))
        .with_property(PropertyDescriptor::list("scores", PropertyType::Integer))
        .with_property(PropertyDescriptor::nested(
            "address",
            ModelSchema::new("address")
                .with_property(PropertyDescriptor::text("city"))
                .with_property(PropertyDescriptor::text("zip")),
        ))
        .with_property(PropertyDescriptor::nested_list(
            "lines",
            ModelSchema::new("line")
                .with_property(PropertyDescriptor::text("sku"))
                .with_property(PropertyDescriptor::integer("quantity")),
        ))
}

fn person_binder() -> Binder<JsonModel> {
    Binder::new(JsonModel::new(person_schema()))
}

fn single(property: &str, text: &str) -> UserValues {
    std::iter::once(UserValue::single(property, text)).collect()
}

/// Parses integers and doubles them, so it is distinguishable from
/// `IntegerFormatter`.
struct DoublingFormatter;

impl Formatter for DoublingFormatter {
    type Value = i64;

    fn parse(&self, text: &str) -> Result<i64, FormatError> {
        IntegerFormatter.parse(text).map(|n| n * 2)
    }

    fn format(&self, value: &i64) -> Result<String, FormatError> {
        Ok((value / 2).to_string())
    }
}

struct ShoutFormatter;

impl Formatter for ShoutFormatter {
    type Value = String;

    fn parse(&self, text: &str) -> Result<String, FormatError> {
        Ok(text.to_uppercase())
    }

    fn format(&self, value: &String) -> Result<String, FormatError> {
        Ok(value.to_lowercase())
    }
}

// ── Scalars ──────────────────────────────────────────────────────

#[test]
fn binds_integer_text() {
    init_tracing();
    let mut binder = person_binder();
    let results = binder.bind(&single("age", "42"));

    assert_eq!(results.len(), 1);
    let result = results.get("age").unwrap();
    assert!(result.is_success());
    assert_eq!(result.value(), Some(&json!(42)));
    assert_eq!(binder.model().get_i64("age"), Some(42));
}

#[test]
fn conversion_failure_keeps_raw_text() {
    let mut binder = person_binder();
    let results = binder.bind(&single("age", "abc"));

    let result = results.get("age").unwrap();
    assert_eq!(result.failure_kind(), Some(FailureKind::Conversion));
    assert_eq!(result.original_text(), "abc");
    assert_eq!(result.submitted(), &SubmittedValue::from("abc"));
    assert!(binder.model().get("age").is_none());
}

#[test]
fn binds_bool_decimal_and_dates() {
    let mut binder = person_binder();
    let values: UserValues = vec![
        UserValue::single("active", "on"),
        UserValue::single("balance", "19.99"),
        UserValue::single("birthday", "1990-05-17"),
        UserValue::single("last_login", "2024-03-01T09:30"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    assert!(!results.has_failures());

    let model = binder.model();
    assert_eq!(model.get_bool("active"), Some(true));
    assert_eq!(model.get_f64("balance"), Some(19.99));
    assert_eq!(model.get_str("birthday"), Some("1990-05-17"));
    assert_eq!(model.get_str("last_login"), Some("2024-03-01T09:30:00"));
}

#[test]
fn text_is_bound_verbatim() {
    let mut binder = person_binder();
    binder.bind(&single("name", "  Alice  "));
    assert_eq!(binder.model().get_str("name"), Some("  Alice  "));
}

#[test]
fn blank_non_text_binds_null() {
    let mut binder = person_binder();
    let values: UserValues = vec![UserValue::single("age", "  "), UserValue::single("name", "")]
        .into_iter()
        .collect();

    let results = binder.bind(&values);
    assert!(!results.has_failures());
    assert_eq!(results.get("age").unwrap().value(), Some(&Value::Null));
    assert_eq!(binder.model().get("age"), Some(&Value::Null));
    assert_eq!(binder.model().get_str("name"), Some(""));
}

#[test]
fn blank_non_text_fails_without_empty_as_null() {
    let config = BinderConfig {
        empty_as_null: false,
        ..BinderConfig::default()
    };
    let mut binder = Binder::with_config(
        JsonModel::new(person_schema()),
        FormatterRegistry::with_defaults(),
        &config,
    );

    let results = binder.bind(&single("age", ""));
    assert_eq!(
        results.get("age").unwrap().failure_kind(),
        Some(FailureKind::Conversion)
    );
}

#[test]
fn single_element_multiple_binds_to_scalar() {
    let mut binder = person_binder();
    let values: UserValues = std::iter::once(UserValue::multiple("age", ["7"])).collect();

    let results = binder.bind(&values);
    assert!(results.get("age").unwrap().is_success());
    assert_eq!(binder.model().get_i64("age"), Some(7));
}

#[test]
fn several_values_for_scalar_is_conversion_failure() {
    let mut binder = person_binder();
    let values: UserValues = std::iter::once(UserValue::multiple("age", ["1", "2"])).collect();

    let result = binder.bind(&values).into_vec().remove(0);
    assert_eq!(result.failure_kind(), Some(FailureKind::Conversion));
    assert_eq!(result.original_text(), "1,2");
}

// ── Lists ────────────────────────────────────────────────────────

#[test]
fn multiple_values_bind_to_list() {
    let mut binder = person_binder();
    let values: UserValues = std::iter::once(UserValue::multiple("scores", ["3", "1", "2"])).collect();

    binder.bind(&values);
    assert_eq!(binder.model().get("scores"), Some(&json!([3, 1, 2])));
}

#[test]
fn single_value_is_split_for_list() {
    let mut binder = person_binder();
    binder.bind(&single("tags", "red, green, ,blue"));
    assert_eq!(binder.model().get("tags"), Some(&json!(["red", "green", "blue"])));
}

#[test]
fn custom_list_delimiter() {
    let config = BinderConfig {
        list_delimiter: ";".to_string(),
        ..BinderConfig::default()
    };
    let mut binder = Binder::with_config(
        JsonModel::new(person_schema()),
        FormatterRegistry::with_defaults(),
        &config,
    );

    binder.bind(&single("tags", "a,b;c"));
    assert_eq!(binder.model().get("tags"), Some(&json!(["a,b", "c"])));
}

#[test]
fn empty_multiple_clears_list() {
    let mut binder = Binder::new(JsonModel::with_data(
        person_schema(),
        json!({"tags": ["old"]}),
    ));
    let values: UserValues =
        std::iter::once(UserValue::new("tags", SubmittedValue::Multiple(Vec::new()))).collect();

    binder.bind(&values);
    assert_eq!(binder.model().get("tags"), Some(&json!([])));
}

#[test]
fn bad_list_item_fails_whole_field() {
    let mut binder = person_binder();
    let values: UserValues = std::iter::once(UserValue::multiple("scores", ["1", "x"])).collect();

    let results = binder.bind(&values);
    assert_eq!(
        results.get("scores").unwrap().failure_kind(),
        Some(FailureKind::Conversion)
    );
    assert!(binder.model().get("scores").is_none());
}

#[test]
fn indexed_list_element() {
    let mut binder = person_binder();
    binder.bind(&single("scores[1]", "5"));
    assert_eq!(binder.model().get("scores"), Some(&json!([null, 5])));
}

// ── Nested paths ─────────────────────────────────────────────────

#[test]
fn binds_nested_properties() {
    let mut binder = person_binder();
    let values: UserValues = vec![
        UserValue::single("address.city", "Lisbon"),
        UserValue::single("lines[0].sku", "A-1"),
        UserValue::single("lines[0].quantity", "3"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    assert!(!results.has_failures());
    assert_eq!(
        binder.model().data(),
        &json!({
            "address": {"city": "Lisbon"},
            "lines": [{"sku": "A-1", "quantity": 3}],
        })
    );
}

#[test]
fn path_stopping_at_object_is_unbound() {
    let mut binder = person_binder();
    let results = binder.bind(&single("address", "Lisbon"));
    assert_eq!(
        results.get("address").unwrap().failure_kind(),
        Some(FailureKind::UnboundProperty)
    );
}

#[test]
fn malformed_path_is_unbound() {
    let mut binder = person_binder();
    let results = binder.bind(&single("address..city", "Lisbon"));
    assert_eq!(
        results.get("address..city").unwrap().failure_kind(),
        Some(FailureKind::UnboundProperty)
    );
}

#[test]
fn rejected_write_is_property_access_failure() {
    let mut binder = Binder::new(JsonModel::with_data(
        person_schema(),
        json!({"address": "not an object"}),
    ));

    let results = binder.bind(&single("address.city", "Lisbon"));
    assert_eq!(
        results.get("address.city").unwrap().failure_kind(),
        Some(FailureKind::PropertyAccess)
    );
}

#[test]
fn huge_list_index_is_recorded_not_fatal() {
    let mut binder = person_binder();
    let values: UserValues = vec![
        UserValue::single(format!("tags[{}]", usize::MAX), "x"),
        UserValue::single("tags[100000000]", "y"),
        UserValue::single("name", "Alice"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    assert_eq!(results.len(), 3);
    for result in results.iter().take(2) {
        assert_eq!(result.failure_kind(), Some(FailureKind::PropertyAccess));
    }
    assert!(results.get("name").unwrap().is_success());
    assert_eq!(binder.model().data(), &json!({"name": "Alice"}));
}

// ── Strict and optimistic ────────────────────────────────────────

#[test]
fn optimistic_binder_creates_implicit_bindings() {
    let mut binder = person_binder();
    assert!(!binder.is_strict());

    let binding = binder.get_binding("age").unwrap();
    assert_eq!(binding.origin(), BindingOrigin::Implicit);
    assert_eq!(binding.property_type(), &PropertyType::Integer);
    assert_eq!(binder.bindings().count(), 1);

    binder.get_binding("age");
    assert_eq!(binder.bindings().count(), 1);
}

#[test]
fn optimistic_binder_reports_unknown_property() {
    let mut binder = person_binder();
    assert!(binder.get_binding("nickname").is_none());

    let results = binder.bind(&single("nickname", "Al"));
    let result = results.get("nickname").unwrap();
    assert_eq!(result.failure_kind(), Some(FailureKind::UnboundProperty));
    assert!(result.failure().unwrap().message().contains("nickname"));
}

#[test]
fn strict_binder_rejects_unconfigured_property() {
    let mut binder = person_binder();
    binder.set_strict(true);

    let results = binder.bind(&single("name", "Alice"));
    assert_eq!(
        results.get("name").unwrap().failure_kind(),
        Some(FailureKind::UnboundProperty)
    );
    assert_eq!(binder.model().data(), &json!({}));
    assert!(binder.get_binding("name").is_none());
}

#[test]
fn strict_binder_binds_configured_property() {
    let mut binder = person_binder();
    binder.set_strict(true);
    binder
        .configure_binding(BindingConfiguration::new("name"))
        .unwrap();

    let values: UserValues = vec![
        UserValue::single("name", "Alice"),
        UserValue::single("age", "42"),
    ]
    .into_iter()
    .collect();
    let results = binder.bind(&values);

    assert!(results.get("name").unwrap().is_success());
    assert_eq!(
        results.get("age").unwrap().failure_kind(),
        Some(FailureKind::UnboundProperty)
    );
    assert_eq!(binder.model().data(), &json!({"name": "Alice"}));
}

#[test]
fn strict_mode_ignores_cached_implicit_bindings() {
    let mut binder = person_binder();
    binder.get_binding("name");
    binder.bind(&single("age", "1"));
    binder.set_strict(true);

    let results = binder.bind(&single("name", "Alice"));
    assert_eq!(
        results.get("name").unwrap().failure_kind(),
        Some(FailureKind::UnboundProperty)
    );
    assert_eq!(binder.model().data(), &json!({"age": 1}));
    assert!(binder.get_binding("name").is_none());
    assert!(binder.get_binding("age").is_none());

    binder.set_strict(false);
    assert_eq!(
        binder.get_binding("name").map(|b| b.origin()),
        Some(BindingOrigin::Implicit)
    );
}

#[test]
fn configure_binding_rejects_unknown_property() {
    let mut binder = person_binder();
    let err = binder
        .configure_binding(BindingConfiguration::new("nickname"))
        .unwrap_err();

    match err {
        BinderError::InvalidPropertyPath { path, source } => {
            assert_eq!(path, "nickname");
            assert!(matches!(source, ModelError::UnknownProperty { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn configure_binding_rejects_malformed_path() {
    let mut binder = person_binder();
    let err = binder
        .configure_binding(BindingConfiguration::new("lines[x].sku"))
        .unwrap_err();
    assert!(matches!(
        err,
        BinderError::InvalidPropertyPath {
            source: ModelError::Path(_),
            ..
        }
    ));
}

#[test]
fn configure_binding_replaces_earlier_binding() {
    let mut binder = person_binder();
    binder
        .configure_binding(BindingConfiguration::new("name").with_formatter(ShoutFormatter))
        .unwrap();
    let binding = binder
        .configure_binding(BindingConfiguration::new("name"))
        .unwrap();
    assert!(!binding.has_formatter_override());
    assert_eq!(binder.bindings().count(), 1);
}

#[test]
fn explicit_binding_is_reused_when_optimistic() {
    let mut binder = person_binder();
    binder
        .configure_binding(BindingConfiguration::new("name").with_formatter(ShoutFormatter))
        .unwrap();

    let binding = binder.get_binding("name").unwrap();
    assert_eq!(binding.origin(), BindingOrigin::Explicit);

    binder.bind(&single("name", "alice"));
    assert_eq!(binder.model().get_str("name"), Some("ALICE"));
}

// ── Formatters ───────────────────────────────────────────────────

#[test]
fn later_registration_wins() {
    let mut binder = person_binder();
    binder.bind(&single("age", "21"));
    assert_eq!(binder.model().get_i64("age"), Some(21));

    binder.register_formatter(PropertyType::Integer, DoublingFormatter);
    binder.bind(&single("age", "21"));
    assert_eq!(binder.model().get_i64("age"), Some(42));
}

#[test]
fn binding_override_beats_registry() {
    let mut binder = person_binder();
    binder
        .configure_binding(BindingConfiguration::new("age").with_formatter(DoublingFormatter))
        .unwrap();
    binder.register_formatter(PropertyType::Integer, IntegerFormatter);

    binder.bind(&single("age", "5"));
    assert_eq!(binder.model().get_i64("age"), Some(10));
}

#[test]
fn descriptor_annotation_selects_pattern() {
    let schema = ModelSchema::new("event").with_property(
        PropertyDescriptor::date("on").with_annotation(
            Annotation::new(DATE_FORMAT_MARKER).with("pattern", "%d/%m/%Y"),
        ),
    );
    let mut binder = Binder::new(JsonModel::new(schema));

    binder.bind(&single("on", "17/05/1990"));
    assert_eq!(binder.model().get_str("on"), Some("1990-05-17"));
    assert_eq!(
        binder.formatted_value("on").unwrap(),
        Some("17/05/1990".to_string())
    );
}

#[test]
fn configuration_annotation_selects_pattern() {
    let mut binder = person_binder();
    binder
        .configure_binding(BindingConfiguration::new("birthday").with_annotation(
            Annotation::new(DATE_FORMAT_MARKER).with("pattern", "%d.%m.%Y"),
        ))
        .unwrap();

    binder.bind(&single("birthday", "01.02.2003"));
    assert_eq!(binder.model().get_str("birthday"), Some("2003-02-01"));
}

#[test]
fn broken_annotation_is_conversion_failure() {
    let mut binder = person_binder();
    binder
        .configure_binding(
            BindingConfiguration::new("birthday").with_annotation(Annotation::new(DATE_FORMAT_MARKER)),
        )
        .unwrap();

    let results = binder.bind(&single("birthday", "2003-02-01"));
    assert_eq!(
        results.get("birthday").unwrap().failure_kind(),
        Some(FailureKind::Conversion)
    );
}

#[test]
fn custom_type_needs_registered_formatter() {
    let schema = ModelSchema::new("invoice").with_property(PropertyDescriptor::custom("total", "cents"));
    let mut binder = Binder::new(JsonModel::new(schema));

    let results = binder.bind(&single("total", "250"));
    assert_eq!(
        results.get("total").unwrap().failure_kind(),
        Some(FailureKind::Conversion)
    );

    binder.register_formatter(PropertyType::custom("cents"), IntegerFormatter);
    let results = binder.bind(&single("total", "250"));
    assert!(!results.has_failures());
    assert_eq!(binder.model().get_i64("total"), Some(250));
}

#[test]
fn shared_registry_is_cloned_per_binder() {
    let mut registry = FormatterRegistry::with_defaults();
    registry.register_formatter(PropertyType::Integer, DoublingFormatter);

    let mut first = Binder::with_registry(JsonModel::new(person_schema()), registry.clone());
    let mut second = Binder::with_registry(JsonModel::new(person_schema()), registry);
    second.register_formatter(PropertyType::Integer, IntegerFormatter);

    first.bind(&single("age", "4"));
    second.bind(&single("age", "4"));
    assert_eq!(first.model().get_i64("age"), Some(8));
    assert_eq!(second.model().get_i64("age"), Some(4));
}

// ── Formatted values ─────────────────────────────────────────────

#[test]
fn formatted_value_renders_model_state() {
    let mut binder = Binder::new(JsonModel::with_data(
        person_schema(),
        json!({"age": 42, "active": false, "tags": ["a", "b"]}),
    ));

    assert_eq!(binder.formatted_value("age").unwrap(), Some("42".to_string()));
    assert_eq!(binder.formatted_value("active").unwrap(), Some("false".to_string()));
    assert_eq!(binder.formatted_value("tags").unwrap(), Some("a,b".to_string()));
    assert_eq!(binder.formatted_value("name").unwrap(), None);
}

#[test]
fn formatted_value_of_unknown_property_is_unbound() {
    let mut binder = person_binder();
    assert!(matches!(
        binder.formatted_value("nickname"),
        Err(BinderError::Unbound(_))
    ));
}

#[test]
fn formatted_value_reports_render_errors() {
    let mut binder = Binder::new(JsonModel::with_data(person_schema(), json!({"age": "old"})));
    assert!(matches!(
        binder.formatted_value("age"),
        Err(BinderError::Format(_))
    ));
}

// ── Partial failure ──────────────────────────────────────────────

#[test]
fn failures_do_not_roll_back_other_fields() {
    let mut binder = person_binder();
    let values: UserValues = vec![
        UserValue::single("name", "Alice"),
        UserValue::single("age", "abc"),
        UserValue::single("active", "yes"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    assert_eq!(results.failure_count(), 1);
    assert_eq!(results.successes().count(), 2);
    assert_eq!(
        binder.model().data(),
        &json!({"name": "Alice", "active": true})
    );
}

#[test]
fn results_follow_submission_order() {
    let mut binder = person_binder();
    let values: UserValues = vec![
        UserValue::single("tags", "x"),
        UserValue::single("nickname", "Al"),
        UserValue::single("age", "1"),
        UserValue::single("name", "Bo"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    let order: Vec<&str> = results.iter().map(|r| r.property()).collect();
    assert_eq!(order, vec!["tags", "nickname", "age", "name"]);
}

#[test]
fn empty_values_bind_nothing() {
    let mut binder = person_binder();
    let results = binder.bind(&UserValues::new());
    assert!(results.is_empty());
    assert_eq!(binder.into_model().into_data(), json!({}));
}

fn field_strategy() -> impl Strategy<Value = (&'static str, &'static str, bool)> {
    prop_oneof![
        Just(("age", "42", true)),
        Just(("age", "forty", false)),
        Just(("active", "off", true)),
        Just(("active", "maybe", false)),
        Just(("balance", "1.5", true)),
        Just(("balance", "NaN", false)),
        Just(("name", "Zoe", true)),
        Just(("nickname", "Z", false)),
    ]
}

proptest! {
    #[test]
    fn every_field_gets_exactly_one_result(fields in prop::collection::vec(field_strategy(), 0..12)) {
        let mut binder = person_binder();
        let values: UserValues = fields
            .iter()
            .map(|(property, text, _)| UserValue::single(*property, *text))
            .collect();

        let results = binder.bind(&values);

        prop_assert_eq!(results.len(), fields.len());
        for (result, (property, text, valid)) in results.iter().zip(&fields) {
            prop_assert_eq!(result.property(), *property);
            prop_assert_eq!(result.original_text(), *text);
            prop_assert_eq!(result.is_success(), *valid);
        }
    }

    #[test]
    fn last_valid_submission_is_on_model(ages in prop::collection::vec(0i64..1000, 1..6)) {
        let mut binder = person_binder();
        let values: UserValues = ages
            .iter()
            .map(|age| UserValue::single("age", age.to_string()))
            .collect();

        binder.bind(&values);
        prop_assert_eq!(binder.model().get_i64("age"), ages.last().copied());
    }
}

// ── Typed models ─────────────────────────────────────────────────

/// Hand-written model over typed fields.
struct Signup {
    schema: ModelSchema,
    email: Option<String>,
    seats: Option<i64>,
}

impl Signup {
    fn new() -> Self {
        Self {
            schema: ModelSchema::new("signup")
                .with_property(PropertyDescriptor::text("email"))
                .with_property(PropertyDescriptor::integer("seats")),
            email: None,
            seats: None,
        }
    }
}

impl Model for Signup {
    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn read(&self, property: &formbind_model::ResolvedProperty) -> Option<Value> {
        match property.pointer() {
            "/email" => self.email.clone().map(Value::String),
            "/seats" => self.seats.map(Value::from),
            _ => None,
        }
    }

    fn write(
        &mut self,
        property: &formbind_model::ResolvedProperty,
        value: Value,
    ) -> Result<(), ModelError> {
        match property.pointer() {
            "/email" => self.email = value.as_str().map(str::to_string),
            "/seats" => {
                let seats = value.as_i64();
                if seats.is_some_and(|n| n <= 0) {
                    return Err(ModelError::write(property.path(), "seats must be positive"));
                }
                self.seats = seats;
            }
            other => return Err(ModelError::write(property.path(), format!("no field at {other}"))),
        }
        Ok(())
    }
}

#[test]
fn binds_typed_model() {
    let mut binder = Binder::new(Signup::new());
    let values: UserValues = vec![
        UserValue::single("email", "a@example.com"),
        UserValue::single("seats", "0"),
    ]
    .into_iter()
    .collect();

    let results = binder.bind(&values);
    assert!(results.get("email").unwrap().is_success());
    assert_eq!(
        results.get("seats").unwrap().failure_kind(),
        Some(FailureKind::PropertyAccess)
    );

    let signup = binder.into_model();
    assert_eq!(signup.email.as_deref(), Some("a@example.com"));
    assert_eq!(signup.seats, None);
}

#[test]
fn typed_model_formatted_value() {
    let mut signup = Signup::new();
    signup.seats = Some(3);
    let mut binder = Binder::new(signup);
    assert_eq!(binder.formatted_value("seats").unwrap(), Some("3".to_string()));
    binder.model_mut().seats = None;
    assert_eq!(binder.formatted_value("seats").unwrap(), None);
}
