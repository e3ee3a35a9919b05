// Endpoint registry
//
// Pure mapping from logical resources to absolute URLs, built from one base
// URL. Nothing outside this module spells out a path.

use strum::{Display, EnumIter, IntoStaticStr};
use url::Url;

use crate::error::Error;

/// Logical resource names exposed by the marketplace API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    Login,
    Logout,
    Register,
    Pets,
    /// The signed-in user's own pets.
    PetsMine,
    Products,
    Orders,
    /// The signed-in user's own orders.
    OrdersMine,
    Cart,
    Appointments,
    /// One vet's schedule; the vet id follows as a segment.
    VetAppointments,
    AdminDashboard,
    Blogs,
    Users,
    UserProfile,
    Summary,
    Donations,
    Enquiries,
    Applications,
}

impl Endpoint {
    /// Path suffix relative to the API base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Logout => "/logout",
            Self::Register => "/register",
            Self::Pets => "/pets",
            Self::PetsMine => "/pets/mine",
            Self::Products => "/products",
            Self::Orders => "/orders",
            Self::OrdersMine => "/orders/mine",
            Self::Cart => "/cart",
            Self::Appointments => "/appointments",
            Self::VetAppointments => "/appointments/vet",
            Self::AdminDashboard => "/admin/dashboard",
            Self::Blogs => "/blogs",
            Self::Users => "/users",
            Self::UserProfile => "/users/profile",
            Self::Summary => "/summary",
            Self::Donations => "/donations",
            Self::Enquiries => "/enquiries",
            Self::Applications => "/applications",
        }
    }
}

/// State-changing action addressed to one member of a collection,
/// e.g. `PUT /orders/{id}/cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MemberAction {
    Adopt,
    Cancel,
    Respond,
    Approve,
    Reject,
}

impl MemberAction {
    /// Path segment appended after the member id.
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Adopt => "adopt",
            Self::Cancel => "cancel",
            Self::Respond => "respond",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Resolves [`Endpoint`]s against the configured API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Build a registry rooted at `base`. The base may carry a path prefix
    /// (e.g. `https://host/api`); endpoint paths are appended to it.
    pub fn new(base: Url) -> Result<Self, Error> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self { base })
    }

    pub fn parse(base: &str) -> Result<Self, Error> {
        Self::new(Url::parse(base)?)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a resource collection.
    pub fn url(&self, endpoint: Endpoint) -> Url {
        self.resource(endpoint, &[])
    }

    /// Absolute URL of a resource collection followed by extra path
    /// segments, e.g. `resource(Pets, &["42"])` for `/pets/42`. Segments
    /// are percent-encoded.
    pub fn resource(&self, endpoint: Endpoint, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(endpoint.path().split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        url
    }

    /// Absolute URL of `action` on the member `id` of `endpoint`.
    pub fn action(&self, endpoint: Endpoint, id: &str, action: MemberAction) -> Url {
        self.resource(endpoint, &[id, action.segment()])
    }
}

/// Append query parameters to `url`. An empty slice leaves it untouched.
pub fn with_query(mut url: Url, query: &[(&str, &str)]) -> Url {
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn collection_urls_are_suffixes_of_base() {
        let endpoints = Endpoints::parse("https://api.pawmart.test").unwrap();
        assert_eq!(
            endpoints.url(Endpoint::Pets).as_str(),
            "https://api.pawmart.test/pets"
        );
        assert_eq!(
            endpoints.url(Endpoint::AdminDashboard).as_str(),
            "https://api.pawmart.test/admin/dashboard"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let endpoints = Endpoints::parse("http://localhost:5000/api/").unwrap();
        assert_eq!(
            endpoints.url(Endpoint::Orders).as_str(),
            "http://localhost:5000/api/orders"
        );
        assert_eq!(
            endpoints.resource(Endpoint::Orders, &["o1", "cancel"]).as_str(),
            "http://localhost:5000/api/orders/o1/cancel"
        );
    }

    #[test]
    fn segments_are_percent_encoded() {
        let endpoints = Endpoints::parse("http://localhost").unwrap();
        let url = endpoints.resource(Endpoint::Pets, &["a b/c"]);
        assert_eq!(url.path(), "/pets/a%20b%2Fc");
    }

    #[test]
    fn query_is_appended() {
        let endpoints = Endpoints::parse("http://localhost").unwrap();
        let url = with_query(
            endpoints.url(Endpoint::Products),
            &[("seller", "s1"), ("page", "2")],
        );
        assert_eq!(url.query(), Some("seller=s1&page=2"));
    }

    #[test]
    fn every_endpoint_path_is_absolute() {
        for endpoint in Endpoint::iter() {
            assert!(endpoint.path().starts_with('/'), "{endpoint}");
        }
    }

    #[test]
    fn member_actions_and_scoped_collections() {
        let endpoints = Endpoints::parse("http://localhost/api").unwrap();
        assert_eq!(
            endpoints
                .action(Endpoint::Applications, "a1", MemberAction::Approve)
                .path(),
            "/api/applications/a1/approve"
        );
        assert_eq!(endpoints.url(Endpoint::PetsMine).path(), "/api/pets/mine");
        assert_eq!(
            endpoints.resource(Endpoint::VetAppointments, &["v9"]).path(),
            "/api/appointments/vet/v9"
        );
        assert_eq!(endpoints.url(Endpoint::UserProfile).path(), "/api/users/profile");
    }

    #[test]
    fn cannot_be_a_base_is_rejected() {
        assert!(Endpoints::parse("mailto:someone@example.com").is_err());
    }
}
