use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建部门表
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Departments::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::Description).text().null())
                    .col(
                        ColumnDef::new(Departments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Departments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::EmployeeCode)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::DepartmentId).big_integer().null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问卷表
        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Surveys::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Surveys::Title).string().not_null())
                    .col(ColumnDef::new(Surveys::Description).text().null())
                    .col(ColumnDef::new(Surveys::Instructions).text().null())
                    .col(ColumnDef::new(Surveys::Status).string().not_null())
                    .col(ColumnDef::new(Surveys::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Surveys::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Surveys::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Surveys::Table, Surveys::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问题表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::SurveyId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::OrderNumber).integer().not_null())
                    .col(
                        ColumnDef::new(Questions::IsRequired)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Questions::MinValue).integer().null())
                    .col(ColumnDef::new(Questions::MaxValue).integer().null())
                    .col(ColumnDef::new(Questions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问卷分配表
        manager
            .create_table(
                Table::create()
                    .table(SurveyAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::SurveyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::AssignmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyAssignments::Status).string().not_null())
                    .col(ColumnDef::new(SurveyAssignments::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(SurveyAssignments::AssignedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::StartedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::EvaluatorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::EvaluateeId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::AssignedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评估表（每个分配最多一条评估记录）
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::AssignmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::SurveyId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Evaluations::AssignmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Status).string().not_null())
                    .col(ColumnDef::new(Evaluations::StartedAt).big_integer().not_null())
                    .col(ColumnDef::new(Evaluations::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Evaluations::TotalScore).double().null())
                    .col(ColumnDef::new(Evaluations::Comments).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::AssignmentId)
                            .to(SurveyAssignments::Table, SurveyAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建答案表
        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Answers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Answers::EvaluationId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::AnswerValue).integer().null())
                    .col(ColumnDef::new(Answers::AnswerText).text().null())
                    .col(ColumnDef::new(Answers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Answers::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Answers::Table, Answers::EvaluationId)
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建自评/协调员评估对比表
        manager
            .create_table(
                Table::create()
                    .table(EvaluationComparisons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationComparisons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::SurveyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::SelfEvaluationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::CoordinatorEvaluationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::AverageDifference)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::ComparisonDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationComparisons::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationComparisons::Table,
                                EvaluationComparisons::SelfEvaluationId,
                            )
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationComparisons::Table,
                                EvaluationComparisons::CoordinatorEvaluationId,
                            )
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束：同一创建者下问卷标题唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_surveys_creator_title")
                    .table(Surveys::Table)
                    .col(Surveys::CreatedBy)
                    .col(Surveys::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：同一问卷内题目序号唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_survey_order")
                    .table(Questions::Table)
                    .col(Questions::SurveyId)
                    .col(Questions::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：每次评估每题一个答案
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_answers_evaluation_question")
                    .table(Answers::Table)
                    .col(Answers::EvaluationId)
                    .col(Answers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comparisons_evaluation_pair")
                    .table(EvaluationComparisons::Table)
                    .col(EvaluationComparisons::SelfEvaluationId)
                    .col(EvaluationComparisons::CoordinatorEvaluationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_department_id")
                    .table(Users::Table)
                    .col(Users::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_evaluator_id")
                    .table(SurveyAssignments::Table)
                    .col(SurveyAssignments::EvaluatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_evaluatee_id")
                    .table(SurveyAssignments::Table)
                    .col(SurveyAssignments::EvaluateeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_evaluatee_survey")
                    .table(Evaluations::Table)
                    .col(Evaluations::EvaluateeId)
                    .col(Evaluations::SurveyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(EvaluationComparisons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Departments {
    #[sea_orm(iden = "departments")]
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    EmployeeCode,
    Phone,
    Role,
    DepartmentId,
    Status,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Surveys {
    #[sea_orm(iden = "surveys")]
    Table,
    Id,
    Title,
    Description,
    Instructions,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    SurveyId,
    QuestionText,
    QuestionType,
    OrderNumber,
    IsRequired,
    MinValue,
    MaxValue,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SurveyAssignments {
    #[sea_orm(iden = "survey_assignments")]
    Table,
    Id,
    SurveyId,
    EvaluatorId,
    EvaluateeId,
    AssignmentType,
    Status,
    DueDate,
    AssignedBy,
    AssignedAt,
    StartedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    AssignmentId,
    EvaluatorId,
    EvaluateeId,
    SurveyId,
    AssignmentType,
    Status,
    StartedAt,
    CompletedAt,
    TotalScore,
    Comments,
}

#[derive(DeriveIden)]
enum Answers {
    #[sea_orm(iden = "answers")]
    Table,
    Id,
    EvaluationId,
    QuestionId,
    AnswerValue,
    AnswerText,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EvaluationComparisons {
    #[sea_orm(iden = "evaluation_comparisons")]
    Table,
    Id,
    EvaluateeId,
    SurveyId,
    SelfEvaluationId,
    CoordinatorEvaluationId,
    AverageDifference,
    Status,
    ComparisonDate,
    ReviewedAt,
}
