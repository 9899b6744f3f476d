// Model tests: JSON forms, enum parsing and equipment helpers

mod common;

use common::*;
use netcapacity::models::*;

#[test]
fn domain_serializes_with_display_names() {
    let json = serde_json::to_string(&NetworkDomain::ALL).unwrap();
    assert_eq!(
        json,
        r#"["LAN","Backbone","Datacenter","Fabric IP","Core Internet"]"#
    );
    let back: NetworkDomain = serde_json::from_str(r#""Fabric IP""#).unwrap();
    assert_eq!(back, NetworkDomain::FabricIp);
}

#[test]
fn domain_parses_loose_spellings() {
    assert_eq!("fabric-ip".parse::<NetworkDomain>(), Ok(NetworkDomain::FabricIp));
    assert_eq!("Core Internet".parse::<NetworkDomain>(), Ok(NetworkDomain::CoreInternet));
    assert_eq!("lan".parse::<NetworkDomain>(), Ok(NetworkDomain::Lan));
    let err = "wan".parse::<NetworkDomain>().unwrap_err();
    assert_eq!(err.kind, "network domain");
    assert!(err.to_string().contains("wan"));
}

#[test]
fn enums_parse_external_strings() {
    assert_eq!("routeur".parse::<EquipmentType>(), Ok(EquipmentType::Router));
    assert_eq!("load-balancer".parse::<EquipmentType>(), Ok(EquipmentType::LoadBalancer));
    assert_eq!(
        "end_of_support_both".parse::<SupportStatus>(),
        Ok(SupportStatus::EndOfSupportBoth)
    );
    assert_eq!("CRITICAL".parse::<Criticality>(), Ok(Criticality::Critical));
    assert_eq!("admin_down".parse::<InterfaceStatus>(), Ok(InterfaceStatus::AdminDown));
    assert!("sideways".parse::<InterfaceStatus>().is_err());
}

#[test]
fn support_status_replacement_flag() {
    assert!(SupportStatus::Obsolete.needs_replacement());
    assert!(SupportStatus::EndOfSupportBoth.needs_replacement());
    assert!(!SupportStatus::EndOfSupportSoftware.needs_replacement());
    assert!(!SupportStatus::Active.needs_replacement());
}

#[test]
fn interface_utilization_is_clamped_on_store() {
    let mut i = Interface::new(1, "Gi0/1", 1_000);
    i.apply_utilization((150.0, -3.0));
    assert_eq!(i.in_utilization, 100.0);
    assert_eq!(i.out_utilization, 0.0);
    i.apply_utilization((f64::NAN, 42.0));
    assert_eq!(i.in_utilization, 0.0);
    assert_eq!(i.peak_utilization(), 42.0);
}

#[test]
fn interface_utilization_is_clamped_on_deserialize() {
    let mut json = serde_json::to_value(up(1, "Gi0/1", 10.0, 20.0)).unwrap();
    json["in_utilization"] = serde_json::json!(150.0);
    json["out_utilization"] = serde_json::json!(-3.0);
    let i: Interface = serde_json::from_value(json.clone()).unwrap();
    assert_eq!((i.in_utilization, i.out_utilization), (100.0, 0.0));

    let mut e = serde_json::to_value(equipment(4, "r4", NetworkDomain::Lan, vec![])).unwrap();
    e["interfaces"] = serde_json::json!([json]);
    let e: Equipment = serde_json::from_value(e).unwrap();
    assert_eq!(e.interfaces[0].peak_utilization(), 100.0);
    assert_eq!(e.interfaces[0].out_utilization, 0.0);
}

#[test]
fn equipment_total_utilization_counts_only_up_interfaces() {
    let e = equipment(
        1,
        "r1",
        NetworkDomain::Lan,
        vec![up(1, "a", 20.0, 40.0), up(2, "b", 40.0, 60.0), down(3, "c")],
    );
    assert_eq!(e.active_interfaces().count(), 2);
    assert_eq!(e.total_utilization(), (30.0, 50.0));
    assert_eq!(e.interface_by_name("b").map(|i| i.if_index), Some(2));
    assert!(e.interface_by_name("zz").is_none());

    let idle = equipment(2, "r2", NetworkDomain::Lan, vec![down(1, "a")]);
    assert_eq!(idle.total_utilization(), (0.0, 0.0));
}

#[test]
fn equipment_json_uses_type_key_and_snake_case() {
    let e = equipment(7, "fw-1", NetworkDomain::CoreInternet, vec![]);
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json["type"], "router");
    assert_eq!(json["domain"], "Core Internet");
    assert_eq!(json["support_status"], "active");
    assert_eq!(json["criticality"], "medium");
}

#[test]
fn history_entry_captures_interfaces() {
    let e = equipment(3, "sw", NetworkDomain::Lan, vec![up(1, "a", 10.0, 20.0), down(2, "b")]);
    let entry = HistoryEntry::from_equipment(&e, 1234);
    assert_eq!(entry.equipment_id, 3);
    assert_eq!(entry.timestamp, 1234);
    assert_eq!(entry.interfaces.len(), 2);
    let a = entry.sample("a").unwrap();
    assert_eq!(a.out_utilization, 20.0);
    assert_eq!(a.status, InterfaceStatus::Up);
    assert_eq!(entry.sample("b").map(|s| s.status), Some(InterfaceStatus::Down));
}

#[test]
fn recommendation_carries_priority_and_message() {
    let r = Recommendation::from(RecommendationKind::UrgentCapacityUpgrade);
    assert_eq!(r.priority, RecommendationPriority::Urgent);
    assert!(!r.message.is_empty());
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["kind"], "urgent_capacity_upgrade");
    assert_eq!(json["priority"], "urgent");
}

#[test]
fn every_recommendation_kind_has_a_produced_priority() {
    use RecommendationKind::*;
    let kinds = [
        UrgentCapacityUpgrade,
        CapacityPlanning,
        EquipmentReplacement,
        UrgentSaturationRisk,
        HighSaturationRisk,
        MediumSaturationRisk,
        RedundancyCheck,
        LoadBalancingReview,
    ];
    let mut priorities: Vec<RecommendationPriority> = kinds.iter().map(|k| k.priority()).collect();
    priorities.sort();
    priorities.dedup();
    assert_eq!(
        priorities,
        vec![
            RecommendationPriority::Urgent,
            RecommendationPriority::High,
            RecommendationPriority::Medium,
        ]
    );
    assert_eq!(
        serde_json::to_value(RecommendationPriority::Medium).unwrap(),
        "medium"
    );
}

#[test]
fn alert_json_form() {
    let alert = Alert {
        severity: AlertSeverity::Critical,
        domain: NetworkDomain::Backbone,
        category: AlertCategory::Utilization,
        message: "m".into(),
        value: 82.0,
        threshold: 80.0,
    };
    let json = serde_json::to_value(&alert).unwrap();
    assert_eq!(json["severity"], "critical");
    assert_eq!(json["domain"], "Backbone");
    assert_eq!(json["category"], "utilization");
}
