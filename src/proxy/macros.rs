//! Declaration macros for capabilities and proxied types

/// Declare a capability trait.
///
/// Expands to the trait itself, its [`Described`](crate::proxy::Described)
/// impl on `dyn Trait`, and an impl for
/// [`DispatchProxy`](crate::proxy::DispatchProxy) that routes every method
/// through the proxy's interactor. Supertraits must be capabilities declared
/// the same way.
///
/// Methods take `&self`, return `Result<_, E>` with
/// `E: From<InteractError>`, and take arguments that are `Clone`; an
/// interactor may run the call more than once, and every run gets its own
/// copy of the arguments.
///
/// ```
/// use safeinteract::capability;
///
/// #[derive(Debug)]
/// pub struct UiError;
///
/// impl From<safeinteract::InteractError> for UiError {
///     fn from(_: safeinteract::InteractError) -> Self {
///         UiError
///     }
/// }
///
/// capability! {
///     pub trait Clickable {
///         fn click(&self) -> Result<(), UiError>;
///     }
/// }
/// ```
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $first:ident $(+ $rest:ident)*)? {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident(&self $(, $arg:ident : $arg_ty:ty)*) -> Result<$ok:ty, $err:ty>;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name $(: $first $(+ $rest)*)? {
            $(
                $(#[$method_meta])*
                fn $method(&self $(, $arg: $arg_ty)*) -> ::core::result::Result<$ok, $err>;
            )*
        }

        impl $crate::proxy::Described for dyn $name {
            const DESCRIPTOR: &'static $crate::proxy::TypeDescriptor = &$crate::proxy::TypeDescriptor {
                name: stringify!($name),
                path: concat!(module_path!(), "::", stringify!($name)),
                kind: $crate::proxy::TypeKind::Capability,
                supertypes: &[
                    $(
                        <dyn $first as $crate::proxy::Described>::DESCRIPTOR,
                        $(<dyn $rest as $crate::proxy::Described>::DESCRIPTOR,)*
                    )?
                ],
                methods: &[$(stringify!($method)),*],
            };
        }

        impl<__T, __C, __I> $name for $crate::proxy::DispatchProxy<__T, __C, __I>
        where
            __T: $name + ?Sized,
            __C: ?Sized,
            __I: ?Sized,
            $(
                $crate::proxy::DispatchProxy<__T, __C, __I>: $first $(+ $rest)*,
            )?
            $(
                __I: $crate::interactor::Interactor<__C, $err>,
                $err: ::core::convert::From<$crate::InteractError>,
            )*
        {
            $(
                fn $method(&self $(, $arg: $arg_ty)*) -> ::core::result::Result<$ok, $err> {
                    $crate::proxy::DispatchProxy::dispatch(
                        self,
                        <dyn $name as $crate::proxy::Described>::DESCRIPTOR,
                        stringify!($method),
                        |target: &__T| {
                            <__T as $name>::$method(target $(, ::core::clone::Clone::clone(&$arg))*)
                        },
                    )
                }
            )*
        }
    };
}

/// Describe a concrete type and the capabilities (or described base types)
/// it implements.
///
/// ```
/// use safeinteract::{capability, concrete};
///
/// #[derive(Debug)]
/// pub struct UiError;
///
/// impl From<safeinteract::InteractError> for UiError {
///     fn from(_: safeinteract::InteractError) -> Self {
///         UiError
///     }
/// }
///
/// capability! {
///     pub trait Clickable {
///         fn click(&self) -> Result<(), UiError>;
///     }
/// }
///
/// pub struct Button;
///
/// impl Clickable for Button {
///     fn click(&self) -> Result<(), UiError> {
///         Ok(())
///     }
/// }
///
/// concrete!(Button: dyn Clickable);
/// ```
#[macro_export]
macro_rules! concrete {
    ($ty:ty : $($supertype:ty),+ $(,)?) => {
        impl $crate::proxy::Described for $ty {
            const DESCRIPTOR: &'static $crate::proxy::TypeDescriptor = &$crate::proxy::TypeDescriptor {
                name: stringify!($ty),
                path: concat!(module_path!(), "::", stringify!($ty)),
                kind: $crate::proxy::TypeKind::Concrete,
                supertypes: &[$(<$supertype as $crate::proxy::Described>::DESCRIPTOR),+],
                methods: &[],
            };
        }
    };
    ($ty:ty) => {
        impl $crate::proxy::Described for $ty {
            const DESCRIPTOR: &'static $crate::proxy::TypeDescriptor = &$crate::proxy::TypeDescriptor {
                name: stringify!($ty),
                path: concat!(module_path!(), "::", stringify!($ty)),
                kind: $crate::proxy::TypeKind::Concrete,
                supertypes: &[],
                methods: &[],
            };
        }
    };
}
