use contracts::shared::fetch::FetchError;
use contracts::shared::rest_query::TableQuery;
use contracts::system::profile::{Profile, PROFILES_TABLE, PROFILE_COLUMNS};

use crate::shared::supabase::SupabaseClient;

/// Profile row of the signed-in user; `None` when it does not exist.
pub async fn fetch_profile(client: SupabaseClient, user_id: String) -> Result<Option<Profile>, FetchError> {
    let query = TableQuery::from(PROFILES_TABLE)
        .select(PROFILE_COLUMNS)
        .eq("id", &user_id)
        .range(0, 0);
    let rows: Vec<Profile> = client.select(&query).await?;
    Ok(rows.into_iter().next())
}
