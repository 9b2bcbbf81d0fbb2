use lightswitch::{ClientConfig, EvaluationEvent, FlagEvent, Snapshot, UserContext};

// Flags as the management service would return them on bootstrap.
const BOOTSTRAP: &[u8] = include_bytes!("../../tests/data/flags.json");

pub fn main() -> lightswitch::Result<()> {
    env_logger::init();

    let mut config = ClientConfig::new();
    config.evaluation_logger(|event: EvaluationEvent| {
        println!("Evaluation: {:?}", event);
    });
    let client = config.to_client();

    // Until the snapshot is applied, every flag is unknown and evaluates to None.
    client.init(Snapshot::from_json(BOOTSTRAP)?);

    let user = UserContext::builder("alice")
        .property("country", "KR")
        .build();

    let color = client
        .get_string_value("checkout-color", &user)?
        // default value
        .unwrap_or_else(|| "gray".to_owned());
    println!("checkout-color: {:?}", color);

    // The transport pushes events as they arrive from the service.
    client.handle_event(FlagEvent::from_json(
        br#"{"type": "SWITCH", "data": {"title": "kill-switch", "active": false}}"#,
    )?);

    let kill_switch = client
        .get_boolean_value("kill-switch", &user)?
        .unwrap_or(false);
    println!("kill-switch: {:?}", kill_switch);

    Ok(())
}
