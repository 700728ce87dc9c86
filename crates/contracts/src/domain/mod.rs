//! Descriptors of the console's business entities.
//!
//! Each `aNNN_<entity>` module exports one `DESCRIPTOR`; `REGISTRY` lists
//! them in menu order.

pub mod common;

pub mod a001_department;
pub mod a002_designation;
pub mod a003_drug;
pub mod a004_drug_form;
pub mod a005_product_type;
pub mod a006_gst;
pub mod a007_document_type;
pub mod a008_kyc;
pub mod a009_deal;
pub mod a010_discount_coupon_applicability;
pub mod a011_customer;
pub mod a012_purchase_entry;
pub mod a013_drug_category;
pub mod a014_drug_sub_category;

use crate::shared::metadata::EntityDescriptor;

pub static REGISTRY: &[&EntityDescriptor] = &[
    &a001_department::DESCRIPTOR,
    &a002_designation::DESCRIPTOR,
    &a003_drug::DESCRIPTOR,
    &a004_drug_form::DESCRIPTOR,
    &a005_product_type::DESCRIPTOR,
    &a006_gst::DESCRIPTOR,
    &a007_document_type::DESCRIPTOR,
    &a008_kyc::DESCRIPTOR,
    &a009_deal::DESCRIPTOR,
    &a010_discount_coupon_applicability::DESCRIPTOR,
    &a011_customer::DESCRIPTOR,
    &a012_purchase_entry::DESCRIPTOR,
    &a013_drug_category::DESCRIPTOR,
    &a014_drug_sub_category::DESCRIPTOR,
];

/// Look up a descriptor by `entity_name`
pub fn find(entity_name: &str) -> Option<&'static EntityDescriptor> {
    REGISTRY
        .iter()
        .copied()
        .find(|d| d.entity_name == entity_name)
}

/// Look up a descriptor by its collection path segment
pub fn find_by_resource(resource: &str) -> Option<&'static EntityDescriptor> {
    REGISTRY.iter().copied().find(|d| d.resource == resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metadata::{FieldDependency, FieldType};
    use std::collections::HashSet;

    #[test]
    fn test_names_and_resources_are_unique() {
        let names: HashSet<_> = REGISTRY.iter().map(|d| d.entity_name).collect();
        let resources: HashSet<_> = REGISTRY.iter().map(|d| d.resource).collect();
        let indexes: HashSet<_> = REGISTRY.iter().map(|d| d.entity_index).collect();
        assert_eq!(names.len(), REGISTRY.len());
        assert_eq!(resources.len(), REGISTRY.len());
        assert_eq!(indexes.len(), REGISTRY.len());
    }

    #[test]
    fn test_keys_and_labels_are_declared() {
        for d in REGISTRY {
            let pk = d.field(d.primary_key);
            assert!(pk.is_some(), "{}: missing primary key field", d.entity_name);
            assert!(!pk.unwrap().is_submitted(), "{}: pk must be server assigned", d.entity_name);
            assert!(d.field(d.label_field).is_some(), "{}: missing label field", d.entity_name);
        }
    }

    #[test]
    fn test_status_fields_are_boolean() {
        for d in REGISTRY {
            if let Some(toggle) = d.status {
                let field = d.field(toggle.field).expect("status field declared");
                assert_eq!(field.field_type, FieldType::Boolean, "{}", d.entity_name);
            }
        }
        assert!(find("purchase_entry").unwrap().status.is_none());
        assert_eq!(find("kyc").unwrap().status.unwrap().field, "is_verified");
        assert_eq!(find("deal").unwrap().status.unwrap().field, "is_published");
    }

    #[test]
    fn test_references_resolve() {
        for d in REGISTRY {
            for field in d.fields.iter().filter(|f| f.field_type == FieldType::Reference) {
                let target = field.ref_entity.and_then(find);
                assert!(target.is_some(), "{}.{}: unknown entity", d.entity_name, field.name);
            }
            for dep in d.dependencies {
                assert!(d.field(dep.source()).is_some(), "{}: unknown source", d.entity_name);
                if let FieldDependency::Options { target, resource, .. } = dep {
                    assert!(d.field(target).is_some());
                    assert!(find_by_resource(resource).is_some());
                }
            }
        }
    }

    #[test]
    fn test_patterns_compile_and_apply() {
        let department = find("department").unwrap();
        let code = department.field("department_code").unwrap();
        assert!(code.validate(Some(&serde_json::json!("PHR01"))).is_ok());
        assert!(code.validate(Some(&serde_json::json!("phr01"))).is_err());
        assert!(code.validate(None).is_ok());

        let customer = find("customer").unwrap();
        let mobile = customer.field("mobile").unwrap();
        assert!(mobile.validate(Some(&serde_json::json!("9876543210"))).is_ok());
        assert!(mobile.validate(Some(&serde_json::json!("5876543210"))).is_err());

        let drug = find("drug").unwrap();
        assert_eq!(
            drug.field("drug_name").unwrap().validate(Some(&serde_json::json!("  "))),
            Err("Drug name is required".to_string())
        );
    }

    #[test]
    fn test_binary_entities() {
        assert!(find("drug").unwrap().has_binary_fields());
        assert!(find("kyc").unwrap().has_binary_fields());
        assert!(!find("department").unwrap().has_binary_fields());
    }
}
