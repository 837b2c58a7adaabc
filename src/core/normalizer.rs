//! Record normalization.
//!
//! Stored items hold references to their bundle members rather than embedded copies. This
//! module turns stored rows into [`Record`]s, resolving each member reference of a bundle
//! through a [`MemberResolver`]. Resolution goes one level deep: members are never bundles.

use crate::{
    core::record::{BUNDLE_TYPE, Condition, LEGACY_BOUGHT_FOR_ME_MARKER, Record},
    entities::{BundleMember, Item, bundle_member, item},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, prelude::*};
use std::future::Future;
use tracing::{debug, warn};

/// Source of bundle member references and the rows they point at.
pub trait MemberResolver {
    /// Member ids of `bundle_id`, in display order.
    fn member_refs(&self, bundle_id: i64) -> impl Future<Output = Result<Vec<i64>>> + Send;

    /// Loads one referenced member, `None` when the reference dangles.
    fn resolve_member(
        &self,
        member_id: i64,
    ) -> impl Future<Output = Result<Option<item::Model>>> + Send;
}

impl MemberResolver for DatabaseConnection {
    async fn member_refs(&self, bundle_id: i64) -> Result<Vec<i64>> {
        let refs = BundleMember::find()
            .filter(bundle_member::Column::BundleId.eq(bundle_id))
            .order_by_asc(bundle_member::Column::Position)
            .all(self)
            .await?;
        Ok(refs.into_iter().map(|r| r.member_id).collect())
    }

    async fn resolve_member(&self, member_id: i64) -> Result<Option<item::Model>> {
        Item::find_by_id(member_id)
            .one(self)
            .await
            .map_err(Into::into)
    }
}

/// Maps a stored row to a record without resolving bundle members.
///
/// Dates and prices are taken as stored; an unrecognised condition tag is dropped with a
/// warning. Legacy names carrying [`LEGACY_BOUGHT_FOR_ME_MARKER`] set `bought_for_me`.
#[must_use]
pub fn to_record(model: item::Model) -> Record {
    let condition = model.condition.as_deref().and_then(|tag| {
        tag.parse::<Condition>()
            .inspect_err(|_| warn!("Item {} has unknown condition '{}'", model.id, tag))
            .ok()
    });
    let bought_for_me = model.bought_for_me || model.name.contains(LEGACY_BOUGHT_FOR_ME_MARKER);

    Record {
        id: model.id,
        name: model.name,
        item_type: model.item_type,
        condition,
        purchase_date: model.purchase_date,
        purchase_price: model.purchase_price,
        sale_date: model.sale_date,
        sale_price: model.sale_price,
        link: model.link,
        bundle_id: model.bundle_id,
        bought_for_me,
        members: None,
    }
}

/// Normalizes one stored item, resolving its members when it is a bundle.
///
/// # Errors
/// Returns `MemberResolution` when a member reference does not resolve to an item of the
/// bundle's owner attached to that bundle, and propagates any
/// error of the resolver itself. A bundle is never returned with members missing.
pub async fn normalize_item<R>(resolver: &R, model: item::Model) -> Result<Record>
where
    R: MemberResolver + Sync,
{
    let is_bundle = model.item_type == BUNDLE_TYPE;
    let bundle_id = model.id;
    let owner = model.user_id.clone();
    let mut record = to_record(model);

    if is_bundle {
        let refs = resolver.member_refs(bundle_id).await?;
        debug!("Resolving {} members of bundle {}", refs.len(), bundle_id);

        let mut members = Vec::with_capacity(refs.len());
        for member_id in refs {
            // Only a row of the same owner, attached to this bundle, is a member
            let member = resolver
                .resolve_member(member_id)
                .await?
                .filter(|m| m.user_id == owner && m.bundle_id == Some(bundle_id))
                .ok_or(Error::MemberResolution {
                    bundle_id,
                    member_id,
                })?;
            members.push(to_record(member));
        }
        record.members = Some(members);
    }

    Ok(record)
}

/// Normalizes a whole snapshot, preserving its order.
pub async fn normalize_snapshot<R>(resolver: &R, models: Vec<item::Model>) -> Result<Vec<Record>>
where
    R: MemberResolver + Sync,
{
    let mut records = Vec::with_capacity(models.len());
    for model in models {
        records.push(normalize_item(resolver, model).await?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::record::Role;
    use crate::test_utils::{date, item_model};
    use std::collections::HashMap;

    /// In-memory resolver standing in for the database
    #[derive(Default)]
    struct FakeResolver {
        refs: HashMap<i64, Vec<i64>>,
        items: HashMap<i64, item::Model>,
    }

    impl FakeResolver {
        fn with_bundle(bundle_id: i64, members: Vec<item::Model>) -> Self {
            let refs = HashMap::from([(bundle_id, members.iter().map(|m| m.id).collect())]);
            let items = members.into_iter().map(|m| (m.id, m)).collect();
            Self { refs, items }
        }
    }

    impl MemberResolver for FakeResolver {
        async fn member_refs(&self, bundle_id: i64) -> Result<Vec<i64>> {
            Ok(self.refs.get(&bundle_id).cloned().unwrap_or_default())
        }

        async fn resolve_member(&self, member_id: i64) -> Result<Option<item::Model>> {
            if member_id < 0 {
                return Err(Error::Database(DbErr::Custom("connection lost".to_string())));
            }
            Ok(self.items.get(&member_id).cloned())
        }
    }

    fn bundle_model(id: i64) -> item::Model {
        item::Model {
            item_type: BUNDLE_TYPE.to_string(),
            ..item_model(id, "Lot de 2 articles")
        }
    }

    fn member_model(id: i64, bundle_id: i64, name: &str) -> item::Model {
        item::Model {
            bundle_id: Some(bundle_id),
            purchase_price: None,
            ..item_model(id, name)
        }
    }

    #[test]
    fn test_to_record_maps_fields() {
        let model = item::Model {
            condition: Some("like-new".to_string()),
            sale_date: Some(date(2023, 3, 1)),
            sale_price: Some(12.5),
            ..item_model(7, "Lamp")
        };
        let record = to_record(model);

        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Lamp");
        assert_eq!(record.condition, Some(Condition::LikeNew));
        assert_eq!(record.sale_date, Some(date(2023, 3, 1)));
        assert_eq!(record.role(), Role::Standalone);
        assert!(!record.bought_for_me);
    }

    #[test]
    fn test_to_record_drops_unknown_condition() {
        let model = item::Model {
            condition: Some("mint".to_string()),
            ..item_model(1, "Lamp")
        };
        assert_eq!(to_record(model).condition, None);
    }

    #[test]
    fn test_legacy_marker_sets_bought_for_me() {
        let record = to_record(item_model(1, "Lamp POUR MOI"));
        assert!(record.bought_for_me);
    }

    #[tokio::test]
    async fn test_bundle_members_are_resolved_in_order() -> Result<()> {
        let resolver = FakeResolver::with_bundle(
            1,
            vec![member_model(3, 1, "Zelda"), member_model(2, 1, "Mario")],
        );

        let record = normalize_item(&resolver, bundle_model(1)).await?;

        assert_eq!(record.role(), Role::Bundle);
        let names: Vec<_> = record.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zelda", "Mario"]);
        assert!(record.members().iter().all(|m| m.role() == Role::Member));
        Ok(())
    }

    #[tokio::test]
    async fn test_standalone_item_has_no_members() -> Result<()> {
        let resolver = FakeResolver::default();
        let record = normalize_item(&resolver, item_model(5, "Lamp")).await?;
        assert!(record.members.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_member_reference_fails() {
        let mut resolver = FakeResolver::with_bundle(1, vec![member_model(2, 1, "Mario")]);
        resolver.refs.get_mut(&1).unwrap().push(99);

        let result = normalize_item(&resolver, bundle_model(1)).await;
        assert!(matches!(
            result,
            Err(Error::MemberResolution {
                bundle_id: 1,
                member_id: 99
            })
        ));
    }

    #[tokio::test]
    async fn test_foreign_member_is_not_resolved() {
        let foreign = item::Model {
            user_id: "someone_else".to_string(),
            ..member_model(2, 1, "Mario")
        };
        let resolver = FakeResolver::with_bundle(1, vec![foreign]);

        let result = normalize_item(&resolver, bundle_model(1)).await;
        assert!(matches!(
            result,
            Err(Error::MemberResolution {
                bundle_id: 1,
                member_id: 2
            })
        ));

        let detached = FakeResolver::with_bundle(1, vec![member_model(3, 7, "Zelda")]);
        assert!(normalize_item(&detached, bundle_model(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_resolver_error_propagates() {
        let mut resolver = FakeResolver::default();
        resolver.refs.insert(1, vec![-1]);

        let result = normalize_snapshot(&resolver, vec![item_model(4, "Lamp"), bundle_model(1)]).await;
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
