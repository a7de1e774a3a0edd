//! Agendamentos: criação com checagem de colisão, edição, status, recorrência
//! e exclusão em massa

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::cadastro::{decodificar, Cadastro};
use super::lote::{ItemLote, ResumoLote};
use crate::agenda::{find_conflicts, plan_recurring, Conflito, TimeSlotGrid, GRANULARIDADE_MINUTOS};
use crate::models::{
    Agendamento, AgendamentoRecorrente, AlteracaoAgendamento, FiltroAgenda, Funcionario,
    NovoAgendamento, OpcoesEscrita, StatusAgendamento, Tarefa,
};
use crate::store::{Filtro, RecordStore, Tabela};
use crate::utils::logging::{log_bulk_summary, log_schedule_conflict};
use crate::utils::normalization::matches_search;
use crate::utils::{AppError, AppResult};

/// Requests simultâneos ao store nas operações em massa
pub const LIMITE_LOTE_PADRAO: usize = 8;

#[derive(Clone)]
pub struct AgendaService {
    store: Arc<dyn RecordStore>,
    cadastro: Cadastro,
    grade: Arc<TimeSlotGrid>,
    limite_lote: usize,
}

impl AgendaService {
    pub fn new(store: Arc<dyn RecordStore>, cadastro: Cadastro, grade: Arc<TimeSlotGrid>) -> Self {
        Self {
            store,
            cadastro,
            grade,
            limite_lote: LIMITE_LOTE_PADRAO,
        }
    }

    pub fn com_limite_lote(mut self, limite: usize) -> Self {
        self.limite_lote = limite.max(1);
        self
    }

    pub fn grade(&self) -> &TimeSlotGrid {
        &self.grade
    }

    pub async fn listar(&self, filtro: &FiltroAgenda) -> AppResult<Vec<Agendamento>> {
        let linhas = self.store.list(Tabela::Agenda, &filtro_da_agenda(filtro)).await?;
        let agendamentos = linhas
            .into_iter()
            .map(|l| decodificar::<Agendamento>(Tabela::Agenda, l))
            .collect::<AppResult<Vec<_>>>()?;

        match filtro.busca.as_deref().map(str::trim) {
            Some(termo) if !termo.is_empty() => self.buscar_texto(agendamentos, termo).await,
            _ => Ok(agendamentos),
        }
    }

    /// Busca por nome do funcionário, nome da tarefa, data ou horário
    async fn buscar_texto(&self, agendamentos: Vec<Agendamento>, termo: &str) -> AppResult<Vec<Agendamento>> {
        let funcionarios: HashMap<String, String> = self
            .cadastro
            .listar::<Funcionario>(&Filtro::new())
            .await?
            .into_iter()
            .map(|f| (f.id, f.nome))
            .collect();
        let tarefas: HashMap<String, String> = self
            .cadastro
            .listar::<Tarefa>(&Filtro::new())
            .await?
            .into_iter()
            .map(|t| (t.id, t.nome))
            .collect();

        Ok(agendamentos
            .into_iter()
            .filter(|a| {
                let data_iso = a.data.to_string();
                let data_br = a.data.format("%d/%m/%Y").to_string();
                let campos = [
                    funcionarios.get(&a.funcionario_id).map_or(a.funcionario_id.as_str(), String::as_str),
                    tarefas.get(&a.tarefa_id).map_or(a.tarefa_id.as_str(), String::as_str),
                    data_iso.as_str(),
                    data_br.as_str(),
                    a.horario.as_str(),
                ];
                matches_search(termo, campos)
            })
            .collect())
    }

    pub async fn buscar(&self, id: &str) -> AppResult<Agendamento> {
        match self.store.get(Tabela::Agenda, id).await? {
            Some(linha) => decodificar(Tabela::Agenda, linha),
            None => Err(AppError::NotFound(format!("Agendamento '{}' não encontrado", id))),
        }
    }

    pub async fn criar(&self, mut novo: NovoAgendamento, opcoes: OpcoesEscrita) -> AppResult<Agendamento> {
        validar_campos(&novo.funcionario_id, &novo.tarefa_id, &novo.horario)?;
        novo.horarios_ocupados = self.grade.occupied_slots(&novo.horario, novo.duracao)?;

        let substituidos = self
            .resolver_conflitos(&novo, None, opcoes.sobrescrever)
            .await?;

        let linha = self
            .store
            .insert(Tabela::Agenda, serde_json::to_value(&novo)?)
            .await?;
        let criado: Agendamento = decodificar(Tabela::Agenda, linha)?;

        tracing::info!(
            "✅ Agendamento {} criado: {} em {} às {} ({} min, {} substituído(s))",
            criado.id,
            criado.funcionario_id,
            criado.data,
            criado.horario,
            criado.duracao,
            substituidos.len()
        );
        Ok(criado)
    }

    /// Horários ocupados sempre recalculados a partir de horario + duracao finais
    pub async fn editar(
        &self,
        id: &str,
        alteracao: AlteracaoAgendamento,
        opcoes: OpcoesEscrita,
    ) -> AppResult<Agendamento> {
        let atual = self.buscar(id).await?;

        let mut alvo = NovoAgendamento {
            funcionario_id: alteracao.funcionario_id.unwrap_or(atual.funcionario_id),
            tarefa_id: alteracao.tarefa_id.unwrap_or(atual.tarefa_id),
            data: alteracao.data.unwrap_or(atual.data),
            horario: alteracao.horario.unwrap_or(atual.horario),
            duracao: alteracao.duracao.unwrap_or(atual.duracao),
            horarios_ocupados: Vec::new(),
            status: alteracao.status.unwrap_or(atual.status),
        };
        validar_campos(&alvo.funcionario_id, &alvo.tarefa_id, &alvo.horario)?;
        alvo.horarios_ocupados = self.grade.occupied_slots(&alvo.horario, alvo.duracao)?;

        self.resolver_conflitos(&alvo, Some(id), opcoes.sobrescrever)
            .await?;

        let linha = self
            .store
            .update(Tabela::Agenda, id, serde_json::to_value(&alvo)?)
            .await?;
        decodificar(Tabela::Agenda, linha)
    }

    pub async fn excluir(&self, id: &str) -> AppResult<()> {
        self.store.delete(Tabela::Agenda, id).await?;
        tracing::info!("🗑️ Agendamento {} removido", id);
        Ok(())
    }

    /// `em_andamento` marca o início; `concluida` marca o fim e registra o
    /// tempo estimado da tarefa como tempo real; os demais limpam o fim.
    pub async fn alterar_status(&self, id: &str, status: StatusAgendamento) -> AppResult<Agendamento> {
        let atual = self.buscar(id).await?;
        let agora = Utc::now();

        let mut patch = Map::new();
        patch.insert("status".to_string(), json!(status));

        match status {
            StatusAgendamento::EmAndamento => {
                patch.insert("tempo_inicio".to_string(), json!(agora));
                patch.insert("tempo_fim".to_string(), Value::Null);
                patch.insert("tempo_real".to_string(), Value::Null);
            }
            StatusAgendamento::Concluida => {
                let estimado = match self.cadastro.buscar::<Tarefa>(&atual.tarefa_id).await {
                    Ok(tarefa) => tarefa.tempo_estimado,
                    Err(AppError::NotFound(_)) => GRANULARIDADE_MINUTOS,
                    Err(e) => return Err(e),
                };
                patch.insert("tempo_fim".to_string(), json!(agora));
                patch.insert("tempo_real".to_string(), json!(estimado));
            }
            StatusAgendamento::NaoIniciada | StatusAgendamento::Atrasada => {
                patch.insert("tempo_fim".to_string(), Value::Null);
                patch.insert("tempo_real".to_string(), Value::Null);
            }
        }

        let linha = self
            .store
            .update(Tabela::Agenda, id, Value::Object(patch))
            .await?;
        tracing::info!("⏱️ Agendamento {}: {} → {}", id, atual.status, status);
        decodificar(Tabela::Agenda, linha)
    }

    /// Cria `funcionários × horários × datas` agendamentos, um request por item
    pub async fn criar_recorrente(&self, modelo: AgendamentoRecorrente) -> AppResult<ResumoLote> {
        let plano = plan_recurring(&modelo, &self.grade)?;
        if plano.is_empty() {
            log_bulk_summary("Agendamento recorrente", 0, 0);
            return Ok(ResumoLote::default());
        }

        let funcionarios: BTreeSet<&str> = plano.iter().map(|a| a.funcionario_id.as_str()).collect();
        let filtro = Filtro::new()
            .em("funcionario_id", funcionarios.iter().copied())
            .maior_ou_igual("data", modelo.data_inicio.to_string())
            .menor_ou_igual("data", modelo.data_fim.to_string());
        let existentes = self.existentes(&filtro).await?;

        let conflitos: Vec<Conflito> = plano
            .iter()
            .flat_map(|a| find_conflicts(&a.horarios_ocupados, &a.funcionario_id, a.data, &existentes, None))
            .collect();
        let substituidos = self.aplicar_conflitos(conflitos, modelo.sobrescrever).await?;

        let mut resultados: Vec<(usize, AppResult<String>)> = stream::iter(plano.iter().enumerate())
            .map(|(i, novo)| async move {
                let criado = async {
                    let registro = serde_json::to_value(novo)?;
                    let linha = self.store.insert(Tabela::Agenda, registro).await?;
                    let criado: Agendamento = decodificar(Tabela::Agenda, linha)?;
                    Ok::<_, AppError>(criado.id)
                };
                (i, criado.await)
            })
            .buffer_unordered(self.limite_lote)
            .boxed()
            .collect()
            .await;
        resultados.sort_by_key(|(i, _)| *i);

        let mut resumo = ResumoLote::de_resultados(
            resultados
                .into_iter()
                .map(|(i, r)| (ItemLote::Indice(i), r)),
        );
        resumo.substituidos = substituidos;

        log_bulk_summary("Agendamento recorrente", resumo.solicitados, resumo.sucesso);
        Ok(resumo)
    }

    pub async fn excluir_lote(&self, ids: &[String]) -> AppResult<ResumoLote> {
        let mut unicos: Vec<&str> = Vec::with_capacity(ids.len());
        for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if !unicos.contains(&id) {
                unicos.push(id);
            }
        }
        if unicos.is_empty() {
            return Err(AppError::ValidationError(
                "Informe pelo menos um agendamento".to_string(),
            ));
        }

        Ok(self.remover_cada(unicos).await)
    }

    /// Exige pelo menos um critério; sem filtro apagaria a agenda inteira
    pub async fn excluir_por_filtro(&self, filtro: &FiltroAgenda) -> AppResult<ResumoLote> {
        if filtro.is_empty() {
            return Err(AppError::ValidationError(
                "Informe pelo menos um filtro para a exclusão em massa".to_string(),
            ));
        }
        if let (Some(inicio), Some(fim)) = (filtro.data_inicio, filtro.data_fim) {
            if fim < inicio {
                return Err(AppError::ValidationError(format!(
                    "Data final {} anterior à data inicial {}",
                    fim, inicio
                )));
            }
        }

        let alvo = self.listar(filtro).await?;
        let ids: Vec<&str> = alvo.iter().map(|a| a.id.as_str()).collect();
        Ok(self.remover_cada(ids).await)
    }

    async fn remover_cada(&self, ids: Vec<&str>) -> ResumoLote {
        let mut resultados: Vec<(usize, &str, _)> = stream::iter(ids.iter().copied().enumerate())
            .map(|(i, id)| async move {
                let removido = self.store.delete(Tabela::Agenda, id).await.map(|_| id.to_string());
                (i, id, removido)
            })
            .buffer_unordered(self.limite_lote)
            .boxed()
            .collect()
            .await;
        resultados.sort_by_key(|(i, _, _)| *i);

        let resumo = ResumoLote::de_resultados(
            resultados
                .into_iter()
                .map(|(_, id, r)| (ItemLote::Id(id.to_string()), r)),
        );
        log_bulk_summary("Exclusão em massa", resumo.solicitados, resumo.sucesso);
        resumo
    }

    async fn existentes(&self, filtro: &Filtro) -> AppResult<Vec<Agendamento>> {
        self.store
            .list(Tabela::Agenda, filtro)
            .await?
            .into_iter()
            .map(|l| decodificar(Tabela::Agenda, l))
            .collect()
    }

    async fn resolver_conflitos(
        &self,
        alvo: &NovoAgendamento,
        ignorar_id: Option<&str>,
        sobrescrever: bool,
    ) -> AppResult<Vec<String>> {
        let filtro = Filtro::new()
            .igual("funcionario_id", alvo.funcionario_id.as_str())
            .igual("data", alvo.data.to_string());
        let existentes = self.existentes(&filtro).await?;

        let conflitos = find_conflicts(
            &alvo.horarios_ocupados,
            &alvo.funcionario_id,
            alvo.data,
            &existentes,
            ignorar_id,
        );
        if !conflitos.is_empty() {
            log_schedule_conflict(&alvo.funcionario_id, &alvo.data.to_string(), conflitos.len());
        }
        self.aplicar_conflitos(conflitos, sobrescrever).await
    }

    /// Recusa com 409 ou, com `sobrescrever`, remove os agendamentos em conflito
    async fn aplicar_conflitos(&self, conflitos: Vec<Conflito>, sobrescrever: bool) -> AppResult<Vec<String>> {
        if conflitos.is_empty() {
            return Ok(Vec::new());
        }
        if !sobrescrever {
            return Err(AppError::ScheduleConflict(conflitos));
        }

        let mut ids: Vec<String> = conflitos.into_iter().map(|c| c.agendamento_id).collect();
        ids.sort();
        ids.dedup();

        let removidos = self.store.delete_many(Tabela::Agenda, &ids).await?;
        tracing::info!("♻️ {} agendamento(s) substituído(s)", removidos.len());
        Ok(removidos)
    }
}

fn validar_campos(funcionario_id: &str, tarefa_id: &str, horario: &str) -> AppResult<()> {
    for (campo, valor) in [
        ("funcionario_id", funcionario_id),
        ("tarefa_id", tarefa_id),
        ("horario", horario),
    ] {
        if valor.trim().is_empty() {
            return Err(AppError::ValidationError(format!("Campo obrigatório: {}", campo)));
        }
    }
    Ok(())
}

fn filtro_da_agenda(filtro: &FiltroAgenda) -> Filtro {
    let mut f = Filtro::new();
    if let Some(funcionario_id) = &filtro.funcionario_id {
        f = f.igual("funcionario_id", funcionario_id.as_str());
    }
    if let Some(data) = filtro.data {
        f = f.igual("data", data.to_string());
    }
    if let Some(inicio) = filtro.data_inicio {
        f = f.maior_ou_igual("data", inicio.to_string());
    }
    if let Some(fim) = filtro.data_fim {
        f = f.menor_ou_igual("data", fim.to_string());
    }
    if let Some(status) = filtro.status {
        f = f.igual("status", status.as_str());
    }
    f
}
