pub(crate) mod date;
pub(crate) mod jq;
pub(crate) mod timezone;

pub(crate) use date::{parse_date, parse_timestamp};
pub(crate) use jq::filter_json;
pub(crate) use timezone::Timezone;
