//! Commands and queries accepted by the mediator.
//!
//! Each request type implements [`Message`], which ties it to a
//! [`RequestKind`] and to the shape of the reply its handler produces. The
//! closed [`Request`] and [`Reply`] enums let the mediator route messages
//! through a type-erased pipeline without runtime type inspection.

use std::fmt;

use crate::domain::customer::{CustomerId, CustomerView};

/// Command creating a customer record.
///
/// Every field may be absent or empty; validation decides whether the command
/// reaches its handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateCustomer {
    /// Identifier requested by the caller; zero or negative asks the store to
    /// allocate one.
    pub customer_id: i32,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
}

/// Query listing every customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetAllCustomers;

/// Query fetching a single customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCustomerById {
    /// Identifier to look up.
    pub id: i32,
}

impl GetCustomerById {
    /// Query for `id`.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self { id }
    }
}

/// Discriminant used as the routing key for handlers and validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKind {
    /// [`CreateCustomer`].
    CreateCustomer,
    /// [`GetAllCustomers`].
    GetAllCustomers,
    /// [`GetCustomerById`].
    GetCustomerById,
}

impl RequestKind {
    /// Every kind the mediator must be able to route.
    pub const ALL: [RequestKind; 3] = [
        RequestKind::CreateCustomer,
        RequestKind::GetAllCustomers,
        RequestKind::GetCustomerById,
    ];

    /// Stable name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateCustomer => "create_customer",
            Self::GetAllCustomers => "get_all_customers",
            Self::GetCustomerById => "get_customer_by_id",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-erased request travelling through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Create a customer.
    CreateCustomer(CreateCustomer),
    /// List customers.
    GetAllCustomers(GetAllCustomers),
    /// Fetch one customer.
    GetCustomerById(GetCustomerById),
}

impl Request {
    /// Routing key of this request.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::CreateCustomer(_) => RequestKind::CreateCustomer,
            Self::GetAllCustomers(_) => RequestKind::GetAllCustomers,
            Self::GetCustomerById(_) => RequestKind::GetCustomerById,
        }
    }
}

/// Type-erased handler output travelling back through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Identifier assigned by the repository.
    Created(CustomerId),
    /// Every customer, in repository order.
    Customers(Vec<CustomerView>),
    /// A single customer, or `None` when absent.
    Customer(Option<CustomerView>),
}

/// A request type the mediator knows how to route.
pub trait Message: Sized + Send + 'static {
    /// Value the handler produces for this request.
    type Output: Send + 'static;

    /// Routing key shared by the handler and validators of this request.
    const KIND: RequestKind;

    /// Erase the request type.
    fn into_request(self) -> Request;

    /// Recover the typed request, if `request` is of this kind.
    fn from_request(request: Request) -> Option<Self>;

    /// Borrow the typed request, if `request` is of this kind.
    fn view(request: &Request) -> Option<&Self>;

    /// Erase the handler output.
    fn into_reply(output: Self::Output) -> Reply;

    /// Recover the typed output, if `reply` has this request's shape.
    fn from_reply(reply: Reply) -> Option<Self::Output>;
}

macro_rules! impl_message {
    ($message:ident => $output:ty, $reply:ident) => {
        impl Message for $message {
            type Output = $output;

            const KIND: RequestKind = RequestKind::$message;

            fn into_request(self) -> Request {
                Request::$message(self)
            }

            fn from_request(request: Request) -> Option<Self> {
                match request {
                    Request::$message(inner) => Some(inner),
                    _ => None,
                }
            }

            fn view(request: &Request) -> Option<&Self> {
                match request {
                    Request::$message(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_reply(output: Self::Output) -> Reply {
                Reply::$reply(output)
            }

            fn from_reply(reply: Reply) -> Option<Self::Output> {
                match reply {
                    Reply::$reply(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_message!(CreateCustomer => CustomerId, Created);
impl_message!(GetAllCustomers => Vec<CustomerView>, Customers);
impl_message!(GetCustomerById => Option<CustomerView>, Customer);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CreateCustomer::default().into_request(), RequestKind::CreateCustomer)]
    #[case(GetAllCustomers.into_request(), RequestKind::GetAllCustomers)]
    #[case(GetCustomerById::new(3).into_request(), RequestKind::GetCustomerById)]
    fn erased_requests_report_their_kind(#[case] request: Request, #[case] expected: RequestKind) {
        assert_eq!(request.kind(), expected);
    }

    #[rstest]
    fn typed_request_is_recovered_from_its_own_kind_only() {
        let request = GetCustomerById::new(9).into_request();

        assert_eq!(GetCustomerById::view(&request), Some(&GetCustomerById::new(9)));
        assert!(CreateCustomer::view(&request).is_none());
        assert_eq!(GetCustomerById::from_request(request.clone()), Some(GetCustomerById::new(9)));
        assert!(GetAllCustomers::from_request(request).is_none());
    }

    #[rstest]
    fn replies_of_the_wrong_shape_are_rejected() {
        let reply = CreateCustomer::into_reply(CustomerId::new(4));

        assert_eq!(CreateCustomer::from_reply(reply.clone()), Some(CustomerId::new(4)));
        assert!(GetAllCustomers::from_reply(reply.clone()).is_none());
        assert!(GetCustomerById::from_reply(reply).is_none());
    }

    #[rstest]
    fn every_kind_has_a_distinct_name() {
        let mut names: Vec<_> = RequestKind::ALL.iter().map(|kind| kind.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RequestKind::ALL.len());
    }
}
