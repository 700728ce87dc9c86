//! Sidebar with collapsible groups of master-data screens

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use contracts::domain;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    /// `EntityDescriptor::entity_name`s
    entities: &'static [&'static str],
}

const MENU_GROUPS: &[MenuGroup] = &[
    MenuGroup {
        id: "organization",
        label: "Organization",
        icon: "building",
        entities: &["department", "designation"],
    },
    MenuGroup {
        id: "catalog",
        label: "Catalog",
        icon: "pill",
        entities: &[
            "drug",
            "drug_category",
            "drug_sub_category",
            "drug_form",
            "product_type",
            "gst",
        ],
    },
    MenuGroup {
        id: "customers",
        label: "Customers",
        icon: "users",
        entities: &["customer", "kyc", "document_type"],
    },
    MenuGroup {
        id: "promotions",
        label: "Promotions",
        icon: "gift",
        entities: &["deal", "discount_coupon_applicability"],
    },
    MenuGroup {
        id: "inventory",
        label: "Inventory",
        icon: "truck",
        entities: &["purchase_entry"],
    },
];

#[component]
pub fn Sidebar(ctx: AppGlobalContext) -> impl IntoView {
    let expanded_groups = RwSignal::new(
        MENU_GROUPS.iter().map(|g| g.id).collect::<Vec<&'static str>>(),
    );

    view! {
        <div class="app-sidebar__content">
            {MENU_GROUPS.iter().map(|group| {
                let group_id = group.id;
                view! {
                    <div>
                        <div
                            class="app-sidebar__item"
                            style:padding-left="12px"
                            on:click=move |_| {
                                expanded_groups.update(|items| {
                                    if let Some(pos) = items.iter().position(|x| *x == group_id) {
                                        items.remove(pos);
                                    } else {
                                        items.push(group_id);
                                    }
                                });
                            }
                        >
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=move || expanded_groups.get().contains(&group_id)
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>

                        <Show when=move || expanded_groups.get().contains(&group_id)>
                            <div class="app-sidebar__children">
                                {group.entities.iter().filter_map(|name| domain::find(name)).map(|descriptor| {
                                    let entity_name = descriptor.entity_name;
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || ctx.active.get() == entity_name
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open(entity_name)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(descriptor.ui.icon.unwrap_or_default())}
                                                <span>{descriptor.ui.list_name}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entity_is_reachable_once() {
        let listed: Vec<&str> = MENU_GROUPS.iter().flat_map(|g| g.entities.iter().copied()).collect();
        for descriptor in domain::REGISTRY {
            let hits = listed.iter().filter(|name| **name == descriptor.entity_name).count();
            assert_eq!(hits, 1, "{} in menu {} times", descriptor.entity_name, hits);
        }
        assert_eq!(listed.len(), domain::REGISTRY.len());
    }
}
