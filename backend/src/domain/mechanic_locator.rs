//! Public mechanic feed with demo positions and optional fare quotes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{MechanicDirectory, MechanicLocation, UserRepository};
use crate::domain::{Coordinates, Error, Role, demo_mechanic_coordinates, flat_rate_fare};

#[derive(Clone)]
pub struct MechanicLocatorService<U> {
    users: Arc<U>,
}

impl<U> MechanicLocatorService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> MechanicDirectory for MechanicLocatorService<U>
where
    U: UserRepository,
{
    async fn locate(&self, origin: Option<Coordinates>) -> Result<Vec<MechanicLocation>, Error> {
        let mechanics = self
            .users
            .list_by_role(Role::Mechanic)
            .await
            .map_err(map_user_error)?;

        let mut located: Vec<MechanicLocation> = mechanics
            .iter()
            .map(|mechanic| {
                let position = demo_mechanic_coordinates(mechanic.id());
                let distance_km = origin.map(|origin| origin.haversine_km(position));
                MechanicLocation {
                    id: mechanic.id(),
                    name: mechanic.name().to_owned(),
                    lat: position.lat(),
                    lng: position.lng(),
                    phone: mechanic.phone().map(str::to_owned),
                    distance_km,
                    estimated_fare: distance_km.map(flat_rate_fare),
                }
            })
            .collect();

        if origin.is_some() {
            located.sort_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
            });
        }
        Ok(located)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{Email, PasswordDigest, User, UserId, UserRecord};

    fn mechanic(id: i64) -> User {
        User::from(UserRecord {
            id: UserId::new(id),
            name: format!("Mech {id}"),
            email: Email::new(format!("m{id}@example.com")).expect("email"),
            password: PasswordDigest::from_plaintext("pw"),
            role: Role::Mechanic,
            phone: Some("98100".to_owned()),
            verified: true,
            created_at: Utc::now(),
        })
    }

    fn service() -> MechanicLocatorService<MockUserRepository> {
        let mut users = MockUserRepository::new();
        users
            .expect_list_by_role()
            .withf(|role| *role == Role::Mechanic)
            .returning(|_| Ok(vec![mechanic(4), mechanic(5), mechanic(7)]));
        MechanicLocatorService::new(Arc::new(users))
    }

    #[rstest]
    #[tokio::test]
    async fn without_origin_keeps_order_and_omits_quotes() {
        let feed = service().locate(None).await.expect("feed");
        let ids: Vec<i64> = feed.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![4, 5, 7]);
        assert!((feed[1].lat - 28.70).abs() < 1e-9);
        assert!(feed.iter().all(|m| m.distance_km.is_none()));
    }

    #[rstest]
    #[tokio::test]
    async fn with_origin_sorts_nearest_first() {
        let origin = Coordinates::try_new(28.70, 77.10).expect("finite");
        let feed = service().locate(Some(origin)).await.expect("feed");
        let ids: Vec<i64> = feed.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![5, 7, 4]);
        assert_eq!(feed[0].distance_km, Some(0.0));
        assert_eq!(feed[0].estimated_fare, Some(150.0));
    }
}
