//! Derive macros for hoi4save.
//!
//! Record types should derive `Decode`.

/// Decode derive macro for save records.
///
/// Derives both `hoi4save::Decode` and `hoi4save::record::Record`, binding
/// each named field to the wire key of the same name. Example use:
///
/// ```
/// #[derive(Debug, Default, hoi4save_macros::Decode)]
/// pub struct PlayerCountry {
///     user: String,
///     #[hoi4(rename = "country_leader")]
///     leader: bool,
///     id: i64,
/// }
///
/// let empty: PlayerCountry = hoi4save::from_slice(b"HOI4bin")?;
/// assert_eq!(empty.id, 0);
/// # Ok::<(), hoi4save::Error>(())
/// ```
///
/// Struct attributes:
/// * `crate`: Record is declared inside the main hoi4save crate.
///
/// Field attributes:
/// * `rename`: Bind the field to the given wire key instead of its own
///   name.
/// * `flatten`: Embed another record's fields at this position. The field's
///   type must itself derive `Decode`, and its keys dispatch as if declared
///   directly on this record.
///
/// ## Flattened records
///
/// ```
/// #[derive(Debug, Default, hoi4save_macros::Decode)]
/// struct Identity {
///     name: String,
///     id: u32,
/// }
///
/// #[derive(Debug, Default, hoi4save_macros::Decode)]
/// struct Country {
///     #[hoi4(flatten)]
///     identity: Identity,
///     capital: u32,
/// }
/// ```
///
/// A `Country` decodes `name`, `id` and `capital` keys from one flat
/// `key = value` sequence; the first two land in `identity`.
///
/// ## Repeated keys
///
/// A field of type `hoi4save::Duplicated` collects every occurrence of
/// its key instead of keeping only the last one.
#[proc_macro_derive(Decode, attributes(hoi4))]
pub fn derive_decode(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    hoi4save_macros_code::derive_decode(input.into()).into()
}
/* vim: textwidth=80
 */
