use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MemberDoc { pub email: String }

#[derive(ToSchema)]
pub struct CreateMerchantDoc {
    pub code: Option<String>,
    pub members: Option<Vec<MemberDoc>>,
}

#[derive(ToSchema)]
pub struct AddMemberDoc { pub email: String }

#[derive(ToSchema)]
pub struct MessageDoc {
    pub message: String,
    pub code: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MemberPageDoc {
    pub page: usize,
    pub total_pages: usize,
    pub count: usize,
    pub data: Vec<MemberDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::merchants::list_merchants,
        crate::routes::merchants::create_merchant,
        crate::routes::merchants::delete_merchant,
        crate::routes::merchants::add_member,
        crate::routes::merchants::remove_member,
        crate::routes::merchants::list_members,
    ),
    components(
        schemas(
            HealthResponse,
            MemberDoc,
            CreateMerchantDoc,
            AddMemberDoc,
            MessageDoc,
            MemberPageDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "merchant")
    )
)]
pub struct ApiDoc;
